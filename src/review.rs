//! The review record produced by the extraction pipeline.

use serde::{Deserialize, Serialize};
use url::Url;

/// A single Backloggd review, fully resolved.
///
/// Every URL field is absolute; relative hrefs are resolved against the review
/// page's own resolved URL during extraction. A record is built once per
/// pipeline run and never mutated — the cover image discovered on the game
/// page is added through [`ReviewInfo::with_image`], which produces a new
/// record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewInfo {
    /// Canonical URL of the review page
    pub url: Url,

    /// Review date as displayed on the page, "Reviewed on " prefix stripped
    pub date: String,

    /// Reviewer display name
    pub reviewer: String,

    /// Reviewer profile URL
    pub reviewer_url: Url,

    /// Reviewer avatar image URL
    pub reviewer_avatar: Url,

    /// Game title
    pub game: String,

    /// Game page URL
    pub game_url: Url,

    /// Platform the review was logged against, when shown
    pub platform: Option<String>,

    /// Platform page URL; present iff `platform` is present
    pub platform_url: Option<Url>,

    /// Raw star-rating width value (e.g. "80%"), absent when no rating is shown
    pub stars_percentage: Option<String>,

    /// Review body: every paragraph block re-wrapped in `<p>…</p>` with its
    /// inner markup preserved, concatenated in page order
    pub body: String,

    /// High-resolution cover image from the linked game page, when available
    pub image: Option<Url>,

    /// Whether the review carries the mastered marker
    pub mastered: bool,

    /// Whether the reviewer carries the backer badge
    pub backer: bool,

    /// Whether the review is marked as a replay
    pub replay: bool,

    /// Play status label (e.g. "Played", "Completed")
    pub status: String,

    /// Play status page URL
    pub status_url: Url,
}

impl ReviewInfo {
    /// Complete the record with the cover image discovered on the game page.
    pub fn with_image(self, image: Url) -> Self {
        Self {
            image: Some(image),
            ..self
        }
    }
}
