//! Review and game page extraction
//!
//! Pure functions from a parsed HTML document plus the page's resolved URL
//! to structured data. Nothing in this module performs I/O; fetching is the
//! pipeline's job.

mod error;
mod game_page;
mod review_page;

pub use error::ExtractError;
pub use game_page::extract_cover_image;
pub use review_page::extract_review;

use scraper::ElementRef;
use url::Url;

/// Resolve an element's attribute as an absolute URL against `base`.
fn resolve_attr(
    element: ElementRef<'_>,
    attr: &'static str,
    what: &'static str,
    base: &Url,
) -> Result<Url, ExtractError> {
    let value = element
        .value()
        .attr(attr)
        .ok_or(ExtractError::MissingAttr { what, attr })?;
    Ok(base.join(value)?)
}

/// Collect an element's text content, trimmed.
fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
