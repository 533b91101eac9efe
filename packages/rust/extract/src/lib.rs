//! Link scanning, provider classification, and preview resolution.
//!
//! Everything in this crate is a pure function over strings: no network,
//! no clock. The pipeline in `pathfinder-core` decides what to fetch based
//! on what these functions return.
//!
//! - [`scanner`]: finds `[label](url)` links in free text
//! - [`classify`]: maps a URL to a [`Provider`](pathfinder_shared::Provider)
//! - [`preview`]: derives video ids, `owner/repo` paths, and preview refs

pub mod classify;
pub mod preview;
pub mod scanner;

pub use classify::{classify, parse_http_url};
pub use preview::{RepoPath, article_host, preview_ref, repo_path, video_id};
pub use scanner::{ScannedLink, is_advertised_link, scan_bare_url, scan_links};
