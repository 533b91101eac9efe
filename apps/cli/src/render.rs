//! Plain-text rendering of roadmaps and extracted links.

use std::fmt::Write;

use pathfinder_shared::{ExtractionResult, LearningPath, LinkCard, RoadmapDocument};

/// Thumbnail image for a video id.
pub(crate) fn video_thumbnail(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{video_id}/hqdefault.jpg")
}

/// Social preview image for an `owner/repo` path.
pub(crate) fn repo_thumbnail(repo_path: &str) -> String {
    format!("https://opengraph.githubassets.com/1/{repo_path}")
}

/// Favicon for an article.
pub(crate) fn article_favicon(url: &str) -> String {
    format!("https://s2.googleusercontent.com/s2/favicons?domain_url={url}")
}

/// Full learning path: header, steps, then links.
pub(crate) fn learning_path(path: &LearningPath) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Learning path: {}", path.topic);
    let _ = writeln!(out);
    out.push_str(&roadmap(&path.roadmap));
    out.push_str(&links(&path.links));
    out
}

/// Each step with its fields.
pub(crate) fn roadmap(doc: &RoadmapDocument) -> String {
    let mut out = String::new();
    for step in &doc.steps {
        let _ = writeln!(out, "{}. {}", step.id, step.title);
        if !step.duration.is_empty() {
            let _ = writeln!(out, "   Duration: {}", step.duration);
        }
        if !step.description.is_empty() {
            let _ = writeln!(out, "   {}", step.description);
        }
        write_list(&mut out, "Resources", &step.resources);
        write_list(&mut out, "Practice", &step.practice);
        let _ = writeln!(out);
    }
    out
}

fn write_list(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "   {heading}:");
    for item in items {
        let _ = writeln!(out, "     - {item}");
    }
}

/// The three link sections. An empty section says so explicitly.
pub(crate) fn links(result: &ExtractionResult) -> String {
    let mut out = String::new();
    write_section(&mut out, "Videos", &result.video_links, |c| {
        video_thumbnail(&c.preview_ref)
    });
    write_section(&mut out, "Repositories", &result.code_links, |c| {
        repo_thumbnail(&c.preview_ref)
    });
    write_section(&mut out, "Articles", &result.article_links, |c| {
        article_favicon(&c.url)
    });
    out
}

fn write_section(
    out: &mut String,
    heading: &str,
    cards: &[LinkCard],
    thumbnail: impl Fn(&LinkCard) -> String,
) {
    let _ = writeln!(out, "{heading}:");
    if cards.is_empty() {
        let _ = writeln!(out, "  none found");
    }
    for card in cards {
        let _ = writeln!(out, "  - {}", card.url);
        let _ = writeln!(out, "    preview: {}", thumbnail(card));
    }
    let _ = writeln!(out);
}
