//! Review page field extraction
//!
//! Pulls the normalized review record out of a parsed Backloggd review page.
//! Required elements (reviewer link, avatar, game link, status link, date
//! block) produce [`ExtractError::MissingElement`] when absent; optional
//! elements (platform, star rating) simply stay `None`.

use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

use crate::extract::error::ExtractError;
use crate::extract::{resolve_attr, text_of};
use crate::review::ReviewInfo;

// CSS selector strings, scoped to the review card
const REVIEWER_LINK_SELECTOR_STR: &str = ".review-card a.username-link";
const REVIEWER_AVATAR_SELECTOR_STR: &str = ".review-card .avatar img";
const GAME_LINK_SELECTOR_STR: &str = ".review-card a.game-name";
const PLATFORM_LINK_SELECTOR_STR: &str = ".review-card a.play-platform";
const STARS_SELECTOR_STR: &str = ".review-card .stars-top";
const CARD_TEXT_SELECTOR_STR: &str = ".review-card p";
const BODY_PARAGRAPH_SELECTOR_STR: &str = ".review-card .review-body p";
const MASTERED_SELECTOR_STR: &str = ".review-card .mastered-icon";
const BACKER_SELECTOR_STR: &str = ".review-card .backer-badge";
const REPLAY_SELECTOR_STR: &str = ".review-card i.fa-history";
const STATUS_LINK_SELECTOR_STR: &str = ".review-card .game-status a";

/// Prefix marking the date block among the card's text blocks
const DATE_PREFIX: &str = "Reviewed on ";

static REVIEWER_LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(REVIEWER_LINK_SELECTOR_STR).unwrap());
static REVIEWER_AVATAR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(REVIEWER_AVATAR_SELECTOR_STR).unwrap());
static GAME_LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(GAME_LINK_SELECTOR_STR).unwrap());
static PLATFORM_LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(PLATFORM_LINK_SELECTOR_STR).unwrap());
static STARS_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(STARS_SELECTOR_STR).unwrap());
static CARD_TEXT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(CARD_TEXT_SELECTOR_STR).unwrap());
static BODY_PARAGRAPH_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(BODY_PARAGRAPH_SELECTOR_STR).unwrap());
static MASTERED_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(MASTERED_SELECTOR_STR).unwrap());
static BACKER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(BACKER_SELECTOR_STR).unwrap());
static REPLAY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(REPLAY_SELECTOR_STR).unwrap());
static STATUS_LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(STATUS_LINK_SELECTOR_STR).unwrap());

/// Extract the review record from a parsed review page.
///
/// # Arguments
///
/// * `document` - The parsed review page
/// * `base` - The page's resolved URL; relative hrefs resolve against it and
///   it becomes the record's canonical `url`
///
/// # Returns
///
/// The extracted record with `image` unset; the cover image comes from the
/// linked game page in a later pipeline stage.
pub fn extract_review(document: &Html, base: &Url) -> Result<ReviewInfo, ExtractError> {
    let reviewer_el = document
        .select(&REVIEWER_LINK_SELECTOR)
        .next()
        .ok_or(ExtractError::MissingElement {
            what: "reviewer link",
            selector: REVIEWER_LINK_SELECTOR_STR,
        })?;
    let reviewer = text_of(reviewer_el);
    let reviewer_url = resolve_attr(reviewer_el, "href", "reviewer link", base)?;

    let avatar_el = document
        .select(&REVIEWER_AVATAR_SELECTOR)
        .next()
        .ok_or(ExtractError::MissingElement {
            what: "reviewer avatar",
            selector: REVIEWER_AVATAR_SELECTOR_STR,
        })?;
    let reviewer_avatar = resolve_attr(avatar_el, "src", "reviewer avatar", base)?;

    let game_el = document
        .select(&GAME_LINK_SELECTOR)
        .next()
        .ok_or(ExtractError::MissingElement {
            what: "game link",
            selector: GAME_LINK_SELECTOR_STR,
        })?;
    let game = text_of(game_el);
    let game_url = resolve_attr(game_el, "href", "game link", base)?;

    let (platform, platform_url) = match document.select(&PLATFORM_LINK_SELECTOR).next() {
        Some(el) => (
            Some(text_of(el)),
            Some(resolve_attr(el, "href", "platform link", base)?),
        ),
        None => (None, None),
    };

    let stars_percentage = document
        .select(&STARS_SELECTOR)
        .next()
        .and_then(|el| el.value().attr("style"))
        .and_then(width_value);

    // The date sits in one of the card's short text blocks; only the
    // "Reviewed on " one is the date.
    let date = document
        .select(&CARD_TEXT_SELECTOR)
        .map(text_of)
        .find_map(|text| text.strip_prefix(DATE_PREFIX).map(str::to_string))
        .ok_or(ExtractError::MissingElement {
            what: "review date",
            selector: CARD_TEXT_SELECTOR_STR,
        })?;

    let body: String = document
        .select(&BODY_PARAGRAPH_SELECTOR)
        .map(|p| format!("<p>{}</p>", p.inner_html()))
        .collect();

    let mastered = document.select(&MASTERED_SELECTOR).next().is_some();
    let backer = document.select(&BACKER_SELECTOR).next().is_some();
    let replay = document.select(&REPLAY_SELECTOR).next().is_some();

    let status_el = document
        .select(&STATUS_LINK_SELECTOR)
        .next()
        .ok_or(ExtractError::MissingElement {
            what: "status link",
            selector: STATUS_LINK_SELECTOR_STR,
        })?;
    let status = text_of(status_el);
    let status_url = resolve_attr(status_el, "href", "status link", base)?;

    debug!(%game, %reviewer, "extracted review fields");

    Ok(ReviewInfo {
        url: base.clone(),
        date,
        reviewer,
        reviewer_url,
        reviewer_avatar,
        game,
        game_url,
        platform,
        platform_url,
        stars_percentage,
        body,
        image: None,
        mastered,
        backer,
        replay,
        status,
        status_url,
    })
}

/// Pull the raw `width` value out of an inline style declaration list.
fn width_value(style: &str) -> Option<String> {
    style.split(';').find_map(|declaration| {
        let (property, value) = declaration.split_once(':')?;
        (property.trim() == "width").then(|| value.trim().to_string())
    })
}
