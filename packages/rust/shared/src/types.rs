//! Core domain types for learning roadmaps and extracted links.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RoadmapDocument
// ---------------------------------------------------------------------------

/// A generated learning roadmap: ordered steps plus an optional bag of
/// top-level resources found by search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapDocument {
    /// Steps in the order they should be studied.
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Top-level repositories and articles not tied to a single step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceBag>,
}

impl RoadmapDocument {
    /// True when there is nothing to scan at all.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty() && self.resources.as_ref().is_none_or(ResourceBag::is_empty)
    }
}

/// One unit of a learning roadmap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Sequential identifier ("1", "2", ...).
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Free-text time estimate, e.g. "2-4 hours".
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: String,
    /// Free-text resource lines, each may embed `[label](url)` links.
    #[serde(default)]
    pub resources: Vec<String>,
    /// Free-text practice lines, same embedding rule as `resources`.
    #[serde(default)]
    pub practice: Vec<String>,
}

/// Bare URLs attached to the roadmap as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceBag {
    /// Code repository URLs.
    #[serde(default)]
    pub github: Vec<String>,
    /// Article/blog URLs. Entries are treated as articles regardless of domain.
    #[serde(default)]
    pub blogs: Vec<String>,
}

impl ResourceBag {
    pub fn is_empty(&self) -> bool {
        self.github.is_empty() && self.blogs.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Links
// ---------------------------------------------------------------------------

/// The external service a URL belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    /// Video hosting (YouTube).
    Video,
    /// Code hosting (GitHub).
    CodeRepo,
    /// Generic article or blog post.
    Article,
    /// Not classifiable; only kept when the caller opts in.
    Unknown,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::CodeRepo => "code_repo",
            Self::Article => "article",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A link found while scanning, after classification and validation.
///
/// `preview_ref` is `None` only when the link was rejected; rejected links
/// never reach an [`ExtractionResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedLink {
    pub url: String,
    pub provider: Provider,
    pub preview_ref: Option<String>,
}

impl ExtractedLink {
    /// Convert into an output card. Returns `None` for rejected links.
    pub fn into_card(self) -> Option<LinkCard> {
        let preview_ref = self.preview_ref?;
        Some(LinkCard {
            url: self.url,
            preview_ref,
        })
    }
}

/// An accepted link ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkCard {
    pub url: String,
    /// Stable reference a renderer turns into a thumbnail: a video id,
    /// an `owner/repo` path, or an article host.
    pub preview_ref: String,
}

/// Deduplicated, scan-ordered links per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub video_links: Vec<LinkCard>,
    pub code_links: Vec<LinkCard>,
    pub article_links: Vec<LinkCard>,
}

impl ExtractionResult {
    /// Total number of accepted links across all categories.
    pub fn len(&self) -> usize {
        self.video_links.len() + self.code_links.len() + self.article_links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// LearningPath
// ---------------------------------------------------------------------------

/// End-to-end result for a topic: the roadmap as displayed plus its links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningPath {
    pub topic: String,
    pub roadmap: RoadmapDocument,
    pub links: ExtractionResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roadmap_parses_with_missing_fields() {
        let json = r#"{"steps":[{"id":"1","title":"Basics","resources":["[A](https://a.dev)"]}]}"#;
        let doc: RoadmapDocument = serde_json::from_str(json).expect("parse roadmap");
        assert_eq!(doc.steps.len(), 1);
        assert_eq!(doc.steps[0].title, "Basics");
        assert!(doc.steps[0].practice.is_empty());
        assert!(doc.resources.is_none());
    }

    #[test]
    fn roadmap_parses_resource_bag() {
        let json = r#"{"steps":[],"resources":{"github":["https://github.com/a/b"]}}"#;
        let doc: RoadmapDocument = serde_json::from_str(json).expect("parse roadmap");
        let bag = doc.resources.expect("resources");
        assert_eq!(bag.github, vec!["https://github.com/a/b"]);
        assert!(bag.blogs.is_empty());
    }

    #[test]
    fn empty_document_detection() {
        let mut doc = RoadmapDocument::default();
        assert!(doc.is_empty());

        doc.resources = Some(ResourceBag::default());
        assert!(doc.is_empty());

        doc.resources = Some(ResourceBag {
            github: vec![],
            blogs: vec!["https://dev.to/x".into()],
        });
        assert!(!doc.is_empty());
    }

    #[test]
    fn extraction_result_serializes_camel_case() {
        let result = ExtractionResult {
            video_links: vec![LinkCard {
                url: "https://youtube.com/watch?v=abc123".into(),
                preview_ref: "abc123".into(),
            }],
            ..Default::default()
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains(r#""videoLinks""#));
        assert!(json.contains(r#""previewRef":"abc123""#));
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn rejected_link_has_no_card() {
        let link = ExtractedLink {
            url: "https://github.com/a/b".into(),
            provider: Provider::CodeRepo,
            preview_ref: None,
        };
        assert!(link.into_card().is_none());
    }
}
