//! Game page cover extraction

use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::warn;
use url::Url;

const ARTWORK_SELECTOR_STR: &str = "#artwork-high-res img";

static ARTWORK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(ARTWORK_SELECTOR_STR).unwrap());

/// Locate the high-resolution artwork on a parsed game page and resolve its
/// source against `base`.
///
/// Absence is a normal outcome; plenty of game pages carry no high-res art.
/// An unresolvable source URL is treated the same way.
pub fn extract_cover_image(document: &Html, base: &Url) -> Option<Url> {
    let element = document.select(&ARTWORK_SELECTOR).next()?;
    let src = element.value().attr("src")?;

    match base.join(src) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!("Ignoring unresolvable artwork source `{}`: {}", src, e);
            None
        }
    }
}
