//! Provider classification by URL substring.

use pathfinder_shared::Provider;
use url::Url;

/// Substrings identifying the video host.
const VIDEO_MARKERS: [&str; 2] = ["youtube.com", "youtu.be"];

/// Substring identifying the code host.
const CODE_HOST_MARKER: &str = "github.com";

/// Classify a URL by the provider it belongs to.
///
/// Video markers win over the code host marker. Anything that is not an
/// absolute HTTP(S) URL is [`Provider::Unknown`]; every other URL that
/// matches neither host is an [`Provider::Article`] candidate.
pub fn classify(url: &str) -> Provider {
    if parse_http_url(url).is_none() {
        return Provider::Unknown;
    }

    let lower = url.to_ascii_lowercase();
    if VIDEO_MARKERS.iter().any(|m| lower.contains(m)) {
        Provider::Video
    } else if lower.contains(CODE_HOST_MARKER) {
        Provider::CodeRepo
    } else {
        Provider::Article
    }
}

/// Parse an absolute HTTP(S) URL with a host.
pub fn parse_http_url(raw: &str) -> Option<Url> {
    let url = Url::parse(raw).ok()?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some_and(|h| !h.is_empty()) => Some(url),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_hosts() {
        assert_eq!(classify("https://www.youtube.com/watch?v=abc"), Provider::Video);
        assert_eq!(classify("https://youtu.be/abc"), Provider::Video);
        assert_eq!(classify("https://m.YouTube.com/watch?v=abc"), Provider::Video);
    }

    #[test]
    fn code_host() {
        assert_eq!(classify("https://github.com/rust-lang/rust"), Provider::CodeRepo);
    }

    #[test]
    fn everything_else_is_an_article() {
        assert_eq!(classify("https://dev.to/someone/post"), Provider::Article);
        assert_eq!(classify("http://blog.example.com/a?b=c"), Provider::Article);
    }

    #[test]
    fn non_http_is_unknown() {
        assert_eq!(classify("mailto:someone@example.com"), Provider::Unknown);
        assert_eq!(classify("/relative/path"), Provider::Unknown);
        assert_eq!(classify("javascript:alert(1)"), Provider::Unknown);
        assert_eq!(classify("not a url"), Provider::Unknown);
    }

    #[test]
    fn parse_http_url_requires_host() {
        assert!(parse_http_url("https://example.com").is_some());
        assert!(parse_http_url("file:///etc/passwd").is_none());
        assert!(parse_http_url("data:text/plain,hello").is_none());
    }
}
