//! Freshness and popularity rules for provider metadata.
//!
//! Both rule sets are pure predicates over fetched metadata and an explicit
//! `now`, so a whole extraction run judges every link against the same instant.

use chrono::{DateTime, TimeDelta, Utc};

use crate::{RepoMetadata, VideoMetadata};

/// Videos older than this are stale.
pub const VIDEO_MAX_AGE_DAYS: i64 = 2 * 365;

/// Videos need strictly more views than this.
pub const VIDEO_MIN_VIEWS: u64 = 10_000;

/// Videos need strictly more likes than this.
pub const VIDEO_MIN_LIKES: u64 = 100;

/// Repositories not updated within this window are stale.
pub const REPO_MAX_IDLE_DAYS: i64 = 180;

/// Repositories need at least this many stars.
pub const REPO_MIN_STARS: u64 = 500;

/// Why a link failed its provider's rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortfall {
    Stale,
    TooFewViews,
    TooFewLikes,
    TooFewStars,
    Archived,
}

impl Shortfall {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stale => "stale",
            Self::TooFewViews => "too few views",
            Self::TooFewLikes => "too few likes",
            Self::TooFewStars => "too few stars",
            Self::Archived => "archived",
        }
    }
}

impl std::fmt::Display for Shortfall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First rule a video breaks, if any.
pub fn video_shortfall(meta: &VideoMetadata, now: DateTime<Utc>) -> Option<Shortfall> {
    if now - meta.published_at >= TimeDelta::days(VIDEO_MAX_AGE_DAYS) {
        Some(Shortfall::Stale)
    } else if meta.view_count <= VIDEO_MIN_VIEWS {
        Some(Shortfall::TooFewViews)
    } else if meta.like_count <= VIDEO_MIN_LIKES {
        Some(Shortfall::TooFewLikes)
    } else {
        None
    }
}

/// First rule a repository breaks, if any.
pub fn repo_shortfall(meta: &RepoMetadata, now: DateTime<Utc>) -> Option<Shortfall> {
    if now - meta.updated_at >= TimeDelta::days(REPO_MAX_IDLE_DAYS) {
        Some(Shortfall::Stale)
    } else if meta.star_count < REPO_MIN_STARS {
        Some(Shortfall::TooFewStars)
    } else if meta.archived {
        Some(Shortfall::Archived)
    } else {
        None
    }
}
