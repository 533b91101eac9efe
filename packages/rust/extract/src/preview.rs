//! Preview resolution: stable identifiers a renderer turns into thumbnails.
//!
//! The same identifiers double as the lookup keys for provider metadata
//! (a video id for the video host, `owner/repo` for the code host), so a URL
//! that yields no identifier is rejected before any fetch is attempted.

use pathfinder_shared::Provider;
use url::Url;

use crate::classify::parse_http_url;

/// First path segments on the code host that are site pages, not owners.
const RESERVED_OWNERS: [&str; 11] = [
    "about",
    "collections",
    "explore",
    "features",
    "marketplace",
    "orgs",
    "pricing",
    "search",
    "settings",
    "sponsors",
    "topics",
];

/// An `owner/repo` pair on the code host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoPath {
    pub owner: String,
    pub repo: String,
}

impl std::fmt::Display for RepoPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Extract the video identifier from a video-host URL.
///
/// Supports `youtu.be/{id}`, `youtube.com/watch?v={id}` (any query
/// position), and `youtube.com/{embed,shorts,live,v}/{id}`.
pub fn video_id(raw: &str) -> Option<String> {
    let url = parse_http_url(raw)?;
    let host = normalized_host(&url)?;
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());

    let candidate = match host.as_str() {
        "youtu.be" => segments.next().map(str::to_string),
        "youtube.com" | "youtube-nocookie.com" => match segments.next() {
            Some("watch") => url
                .query_pairs()
                .find(|(k, _)| k == "v")
                .map(|(_, v)| v.into_owned()),
            Some("embed" | "shorts" | "live" | "v") => segments.next().map(str::to_string),
            _ => None,
        },
        _ => None,
    }?;

    is_video_id(&candidate).then_some(candidate)
}

/// Extract `owner/repo` from a code-host URL.
///
/// Takes the first two path segments; a trailing `.git` is dropped.
pub fn repo_path(raw: &str) -> Option<RepoPath> {
    let url = parse_http_url(raw)?;
    if normalized_host(&url)? != "github.com" {
        return None;
    }

    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    let owner = segments.next()?;
    let repo = segments.next()?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);

    if RESERVED_OWNERS.contains(&owner.to_ascii_lowercase().as_str())
        || !is_repo_segment(owner)
        || !is_repo_segment(repo)
    {
        return None;
    }

    Some(RepoPath {
        owner: owner.to_string(),
        repo: repo.to_string(),
    })
}

/// The host of an article URL, used as its preview reference.
pub fn article_host(raw: &str) -> Option<String> {
    let url = parse_http_url(raw)?;
    url.host_str().map(str::to_string)
}

/// Derive the preview reference for a URL of the given provider.
///
/// Pure string transform: this is both the normal preview and the
/// fallback preview used when provider metadata is unavailable.
pub fn preview_ref(provider: Provider, url: &str) -> Option<String> {
    match provider {
        Provider::Video => video_id(url),
        Provider::CodeRepo => repo_path(url).map(|p| p.to_string()),
        Provider::Article | Provider::Unknown => article_host(url),
    }
}

/// Host without a leading `www.` or `m.`, lowercased by the URL parser.
fn normalized_host(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    let host = host
        .strip_prefix("www.")
        .or_else(|| host.strip_prefix("m."))
        .unwrap_or(host);
    Some(host.to_string())
}

fn is_video_id(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn is_repo_segment(s: &str) -> bool {
    !s.is_empty()
        && s != "."
        && s != ".."
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
