//! Error types for the extract module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for extraction operations
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A required element is missing from the page. On a successfully
    /// fetched page this means the site markup changed out from under the
    /// selectors, not that the review is incomplete.
    #[error("missing {what} (selector `{selector}`)")]
    MissingElement {
        /// What the element carries
        what: &'static str,
        /// Selector that failed to match
        selector: &'static str,
    },

    /// An element matched but lacks the attribute carrying its data
    #[error("missing attribute `{attr}` on {what}")]
    MissingAttr {
        /// What the element carries
        what: &'static str,
        /// Attribute that was absent
        attr: &'static str,
    },

    /// URL resolution error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl From<ExtractError> for CrateError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::Url(e) => CrateError::Url(e),
            _ => CrateError::Extract(err.to_string()),
        }
    }
}
