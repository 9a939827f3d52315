//! Card rendering
//!
//! Turns a [`ReviewInfo`] into a self-contained HTML fragment. All styling
//! is inline; pasted cards cannot rely on a stylesheet. The review body is
//! inserted as-is; it already carries its own paragraph markup from
//! extraction.

use crate::review::ReviewInfo;

/// Rendering hints for the card.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Include the cover image when the record carries one
    pub include_image: bool,

    /// Include the attribution footer linking back to the review
    pub include_attribution: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_image: true,
            include_attribution: true,
        }
    }
}

const CARD_STYLE: &str = "max-width:540px;padding:16px;border:1px solid #3a3a46;border-radius:8px;background:#16161a;color:#e7e7e7;font-family:sans-serif;";
const HEADER_STYLE: &str = "display:flex;align-items:center;gap:10px;margin-bottom:12px;";
const AVATAR_STYLE: &str = "width:40px;height:40px;border-radius:4px;";
const REVIEWER_STYLE: &str = "color:#e7e7e7;font-weight:bold;text-decoration:none;";
const DATE_STYLE: &str = "display:block;color:#8a8a93;font-size:12px;";
const GAME_STYLE: &str = "color:#e7e7e7;font-size:18px;font-weight:bold;text-decoration:none;";
const PLATFORM_STYLE: &str = "color:#8a8a93;font-size:12px;margin-left:8px;text-decoration:none;";
const META_STYLE: &str = "margin:8px 0;color:#8a8a93;font-size:13px;";
const STARS_BASE_STYLE: &str = "position:relative;display:inline-block;color:#4a4a55;";
const STARS_FILL_STYLE: &str =
    "position:absolute;left:0;top:0;overflow:hidden;white-space:nowrap;color:#ea377a;";
const STATUS_STYLE: &str = "color:#ea377a;text-decoration:none;margin-left:8px;";
const BADGE_STYLE: &str = "margin-left:8px;color:#f5c518;";
const COVER_STYLE: &str = "max-width:100%;border-radius:4px;margin:8px 0;";
const ATTRIBUTION_STYLE: &str = "margin-top:12px;color:#8a8a93;font-size:12px;";

/// Render a review as a styled HTML card.
pub fn render_card(review: &ReviewInfo, options: &RenderOptions) -> String {
    let mut out = String::new();

    out.push_str(&format!(r#"<div class="review-card-snippet" style="{CARD_STYLE}">"#));

    // Header: avatar, reviewer, date
    out.push_str(&format!(r#"<div class="review-header" style="{HEADER_STYLE}">"#));
    out.push_str(&format!(
        r#"<img class="avatar" src="{}" alt="{}" style="{AVATAR_STYLE}">"#,
        escape_attr(review.reviewer_avatar.as_str()),
        escape_attr(&review.reviewer),
    ));
    out.push_str("<div>");
    out.push_str(&format!(
        r#"<a class="reviewer" href="{}" style="{REVIEWER_STYLE}">{}</a>"#,
        escape_attr(review.reviewer_url.as_str()),
        escape_text(&review.reviewer),
    ));
    out.push_str(&format!(
        r#"<span class="review-date" style="{DATE_STYLE}">{}</span>"#,
        escape_text(&review.date),
    ));
    out.push_str("</div></div>");

    // Title line: game plus optional platform
    out.push_str(r#"<div class="review-title">"#);
    out.push_str(&format!(
        r#"<a class="game" href="{}" style="{GAME_STYLE}">{}</a>"#,
        escape_attr(review.game_url.as_str()),
        escape_text(&review.game),
    ));
    if let (Some(platform), Some(platform_url)) = (&review.platform, &review.platform_url) {
        out.push_str(&format!(
            r#"<a class="platform" href="{}" style="{PLATFORM_STYLE}">{}</a>"#,
            escape_attr(platform_url.as_str()),
            escape_text(platform),
        ));
    }
    out.push_str("</div>");

    // Meta line: stars, status, badges
    out.push_str(&format!(r#"<div class="review-meta" style="{META_STYLE}">"#));
    if let Some(percentage) = &review.stars_percentage {
        out.push_str(&format!(
            r#"<span class="stars" style="{STARS_BASE_STYLE}">&#9733;&#9733;&#9733;&#9733;&#9733;<span class="stars-fill" style="width:{};{STARS_FILL_STYLE}">&#9733;&#9733;&#9733;&#9733;&#9733;</span></span>"#,
            escape_attr(percentage),
        ));
    }
    out.push_str(&format!(
        r#"<a class="status" href="{}" style="{STATUS_STYLE}">{}</a>"#,
        escape_attr(review.status_url.as_str()),
        escape_text(&review.status),
    ));
    if review.mastered {
        out.push_str(&format!(
            r#"<span class="badge mastered" style="{BADGE_STYLE}">Mastered</span>"#
        ));
    }
    if review.backer {
        out.push_str(&format!(
            r#"<span class="badge backer" style="{BADGE_STYLE}">Backer</span>"#
        ));
    }
    if review.replay {
        out.push_str(&format!(
            r#"<span class="badge replay" style="{BADGE_STYLE}">Replay</span>"#
        ));
    }
    out.push_str("</div>");

    if options.include_image {
        if let Some(image) = &review.image {
            out.push_str(&format!(
                r#"<img class="cover" src="{}" alt="{}" style="{COVER_STYLE}">"#,
                escape_attr(image.as_str()),
                escape_attr(&review.game),
            ));
        }
    }

    out.push_str(&format!(r#"<div class="review-text">{}</div>"#, review.body));

    if options.include_attribution {
        out.push_str(&format!(
            r#"<p class="attribution" style="{ATTRIBUTION_STYLE}">Review by <a href="{}" style="{STATUS_STYLE}">{}</a> on <a href="{}" style="{STATUS_STYLE}">Backloggd</a></p>"#,
            escape_attr(review.reviewer_url.as_str()),
            escape_text(&review.reviewer),
            escape_attr(review.url.as_str()),
        ));
    }

    out.push_str("</div>");
    out
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
