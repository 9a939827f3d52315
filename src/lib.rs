//! # backcard - Backloggd review cards
//!
//! This crate fetches a user-authored review page from Backloggd, extracts a
//! normalized [`ReviewInfo`] record from its HTML, enriches it with the cover
//! image from the linked game page when one is available, and renders the
//! result as a portable HTML snippet.
//!
//! ## Features
//!
//! - Strict review-URL recognition gating all network access
//! - Selector-driven extraction as pure functions over (document, base URL)
//! - Two-stage fetch: the game page is only requested once the review page
//!   yields a game link, and its failure only costs the cover image
//! - Switch-latest pipeline: rapid successive inputs supersede in-flight
//!   runs, and only the newest run's result is ever observable
//! - Renderer and export formatter for pasting cards into other surfaces
//! - Async API with Tokio, structured logging with tracing
//!
//! ## Example
//!
//! ```rust,no_run
//! use backcard::http::HttpClient;
//! use backcard::pipeline::Pipeline;
//! use backcard::render::{RenderOptions, render_card};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let pipeline = Pipeline::new(Arc::new(HttpClient::new()));
//!
//!     if let Some(review) = pipeline
//!         .submit("https://backloggd.com/u/bob/review/42")
//!         .await
//!     {
//!         println!("{}", render_card(&review, &RenderOptions::default()));
//!     }
//! }
//! ```

mod error;
mod review;
mod validate;

pub mod export;
pub mod extract;
pub mod http;
pub mod pipeline;
pub mod render;

pub use error::{Error, Result};
pub use review::ReviewInfo;
pub use validate::is_review_url;

/// Re-export of the crate's main types for public use
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::export::{ExportOptions, export_fragment};
    pub use crate::http::{FetchPage, FetchedPage, HttpClient};
    pub use crate::pipeline::{Phase, Pipeline};
    pub use crate::render::{RenderOptions, render_card};
    pub use crate::review::ReviewInfo;
    pub use crate::validate::is_review_url;
}
