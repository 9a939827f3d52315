//! Extraction pipeline
//!
//! Orchestrates one run per submitted input: validate the URL, fetch the
//! review page, extract the review fields, fetch the linked game page,
//! extract the cover image, and commit the merged record. A run's two fetches
//! are strictly sequential; across runs, each submission takes a fresh
//! generation id and only the run holding the latest id may touch the
//! observable output, the busy flag, or the phase. Superseded runs finish
//! quietly and their results are discarded.
//!
//! A failed review-page fetch (or a page the selectors no longer match)
//! collapses the run to `None`; a failed game-page fetch only costs the
//! cover image.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use scraper::Html;
use tokio::sync::watch;
use tracing::{debug, error, warn};
use url::Url;

use crate::extract::{extract_cover_image, extract_review};
use crate::http::FetchPage;
use crate::review::ReviewInfo;
use crate::validate::is_review_url;

/// Progress of the current extraction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No run in progress
    Idle,
    /// Review page request in flight
    FetchingReview,
    /// Review page fetched, fields being extracted
    ExtractingReview,
    /// Game page request in flight
    FetchingGame,
    /// Game page fetched, cover being extracted
    ExtractingImage,
    /// Run finished with a committed result
    Done,
    /// Run failed; output is `None`
    Failed,
}

/// The extraction pipeline.
///
/// Owns the observable state: current output, busy flag, and phase.
/// Consumers hold read-only [`watch::Receiver`]s; only the pipeline writes.
pub struct Pipeline {
    fetcher: Arc<dyn FetchPage>,
    generation: AtomicU64,
    output_tx: watch::Sender<Option<ReviewInfo>>,
    busy_tx: watch::Sender<bool>,
    phase_tx: watch::Sender<Phase>,
}

impl Pipeline {
    /// Create a pipeline on top of a page-fetch capability.
    pub fn new(fetcher: Arc<dyn FetchPage>) -> Self {
        let (output_tx, _) = watch::channel(None);
        let (busy_tx, _) = watch::channel(false);
        let (phase_tx, _) = watch::channel(Phase::Idle);

        Self {
            fetcher,
            generation: AtomicU64::new(0),
            output_tx,
            busy_tx,
            phase_tx,
        }
    }

    /// Observe the pipeline output.
    pub fn output(&self) -> watch::Receiver<Option<ReviewInfo>> {
        self.output_tx.subscribe()
    }

    /// Observe the busy flag.
    pub fn busy(&self) -> watch::Receiver<bool> {
        self.busy_tx.subscribe()
    }

    /// Observe the run phase.
    pub fn phase(&self) -> watch::Receiver<Phase> {
        self.phase_tx.subscribe()
    }

    /// Snapshot of the current output.
    pub fn current(&self) -> Option<ReviewInfo> {
        self.output_tx.borrow().clone()
    }

    /// Snapshot of the busy flag.
    pub fn is_busy(&self) -> bool {
        *self.busy_tx.borrow()
    }

    /// Snapshot of the run phase.
    pub fn current_phase(&self) -> Phase {
        *self.phase_tx.borrow()
    }

    /// Run one extraction for `input`, superseding any run still in flight.
    ///
    /// Returns the record this run committed, or `None` when the input was
    /// rejected, the run failed, or a later submission superseded it. The
    /// committed value is also observable through [`Pipeline::output`].
    pub async fn submit(&self, input: &str) -> Option<ReviewInfo> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if !is_review_url(input) {
            debug!(input, "not a review URL; clearing output");
            self.set_phase(generation, Phase::Idle);
            self.set_busy(generation, false);
            self.commit(generation, None);
            return None;
        }

        // The pattern check guarantees this parses; guard anyway.
        let url = match Url::parse(input) {
            Ok(url) => url,
            Err(e) => {
                error!("rejecting unparseable input `{}`: {}", input, e);
                self.set_phase(generation, Phase::Idle);
                self.commit(generation, None);
                return None;
            }
        };

        self.set_busy(generation, true);
        let result = self.run(generation, url).await;
        self.set_busy(generation, false);

        if self.commit(generation, result.clone()) {
            result
        } else {
            None
        }
    }

    async fn run(&self, generation: u64, url: Url) -> Option<ReviewInfo> {
        self.set_phase(generation, Phase::FetchingReview);
        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(e) => {
                error!("review page fetch failed for {}: {}", url, e);
                self.set_phase(generation, Phase::Failed);
                return None;
            }
        };

        self.set_phase(generation, Phase::ExtractingReview);
        // Relative links resolve against the URL the page was served from,
        // not the submitted input. The parsed document must not live across
        // the next await: Html is not Send.
        let review = {
            let document = Html::parse_document(&page.body);
            match extract_review(&document, &page.final_url) {
                Ok(review) => review,
                Err(e) => {
                    error!("review extraction failed for {}: {}", page.final_url, e);
                    self.set_phase(generation, Phase::Failed);
                    return None;
                }
            }
        };

        self.set_phase(generation, Phase::FetchingGame);
        let game_page = match self.fetcher.fetch(&review.game_url).await {
            Ok(page) => page,
            Err(e) => {
                // A missing cover degrades the record; it does not fail the run.
                warn!("game page fetch failed for {}: {}", review.game_url, e);
                self.set_phase(generation, Phase::Done);
                return Some(review);
            }
        };

        self.set_phase(generation, Phase::ExtractingImage);
        let image = {
            let document = Html::parse_document(&game_page.body);
            extract_cover_image(&document, &game_page.final_url)
        };

        self.set_phase(generation, Phase::Done);
        match image {
            Some(image) => Some(review.with_image(image)),
            None => Some(review),
        }
    }

    fn is_latest(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn commit(&self, generation: u64, value: Option<ReviewInfo>) -> bool {
        if self.is_latest(generation) {
            self.output_tx.send_replace(value);
            true
        } else {
            debug!(generation, "run superseded; result discarded");
            false
        }
    }

    fn set_busy(&self, generation: u64, busy: bool) {
        if self.is_latest(generation) {
            self.busy_tx.send_replace(busy);
        }
    }

    fn set_phase(&self, generation: u64, phase: Phase) {
        if self.is_latest(generation) {
            debug!(?phase, generation, "pipeline phase");
            self.phase_tx.send_replace(phase);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{FetchedPage, HttpError};
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;
    use tokio::sync::Notify;

    const REVIEW_ONE: &str = "https://backloggd.com/u/bob/review/1";
    const REVIEW_TWO: &str = "https://backloggd.com/u/bob/review/2";
    const GAME_ONE: &str = "https://backloggd.com/games/one";
    const GAME_TWO: &str = "https://backloggd.com/games/two";

    struct Gate {
        started: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[derive(Default)]
    struct FakeFetcher {
        pages: HashMap<String, String>,
        fail: HashSet<String>,
        gates: Mutex<HashMap<String, Gate>>,
    }

    impl FakeFetcher {
        fn with_page(mut self, url: &str, body: impl Into<String>) -> Self {
            self.pages.insert(url.to_string(), body.into());
            self
        }

        fn with_failure(mut self, url: &str) -> Self {
            self.fail.insert(url.to_string());
            self
        }

        fn with_gate(self, url: &str) -> (Self, Arc<Notify>, Arc<Notify>) {
            let started = Arc::new(Notify::new());
            let release = Arc::new(Notify::new());
            self.gates.lock().unwrap().insert(
                url.to_string(),
                Gate {
                    started: started.clone(),
                    release: release.clone(),
                },
            );
            (self, started, release)
        }
    }

    #[async_trait]
    impl FetchPage for FakeFetcher {
        async fn fetch(&self, url: &Url) -> Result<FetchedPage, HttpError> {
            let key = url.to_string();

            let gate = self.gates.lock().unwrap().remove(&key);
            if let Some(gate) = gate {
                gate.started.notify_one();
                gate.release.notified().await;
            }

            if self.fail.contains(&key) {
                return Err(HttpError::Status {
                    status: 500,
                    url: key,
                });
            }

            match self.pages.get(&key) {
                Some(body) => Ok(FetchedPage {
                    status: 200,
                    final_url: url.clone(),
                    body: body.clone(),
                }),
                None => Err(HttpError::Status {
                    status: 404,
                    url: key,
                }),
            }
        }
    }

    fn review_html(game_path: &str, game_name: &str) -> String {
        format!(
            r#"<html><body><div class="review-card">
<div class="avatar"><img src="/avatars/bob.jpg"></div>
<a class="username-link" href="/u/bob">bob</a>
<p>Reviewed on May 5, 2024</p>
<a class="game-name" href="{game_path}">{game_name}</a>
<div class="game-status"><a href="/u/bob/games/played">Played</a></div>
<div class="review-body"><p>body</p></div>
</div></body></html>"#
        )
    }

    const GAME_HTML: &str =
        r#"<html><body><div id="artwork-high-res"><img src="/covers/art.jpg"></div></body></html>"#;

    #[tokio::test]
    async fn rejects_non_review_input() {
        let pipeline = Pipeline::new(Arc::new(FakeFetcher::default()));

        assert_eq!(pipeline.submit("not a url").await, None);
        assert_eq!(pipeline.current(), None);
        assert!(!pipeline.is_busy());
        assert_eq!(pipeline.current_phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn full_run_attaches_cover() {
        let fetcher = FakeFetcher::default()
            .with_page(REVIEW_ONE, review_html("/games/one", "One"))
            .with_page(GAME_ONE, GAME_HTML);
        let pipeline = Pipeline::new(Arc::new(fetcher));

        let review = pipeline.submit(REVIEW_ONE).await.unwrap();
        assert_eq!(review.game, "One");
        assert_eq!(
            review.image.as_ref().map(Url::as_str),
            Some("https://backloggd.com/covers/art.jpg")
        );
        assert!(!pipeline.is_busy());
        assert_eq!(pipeline.current_phase(), Phase::Done);
        assert_eq!(pipeline.current(), Some(review));
    }

    #[tokio::test]
    async fn review_fetch_failure_yields_none() {
        let fetcher = FakeFetcher::default().with_failure(REVIEW_ONE);
        let pipeline = Pipeline::new(Arc::new(fetcher));

        assert_eq!(pipeline.submit(REVIEW_ONE).await, None);
        assert_eq!(pipeline.current(), None);
        assert!(!pipeline.is_busy());
        assert_eq!(pipeline.current_phase(), Phase::Failed);
    }

    #[tokio::test]
    async fn game_fetch_failure_degrades_to_imageless_record() {
        let fetcher = FakeFetcher::default()
            .with_page(REVIEW_ONE, review_html("/games/one", "One"))
            .with_failure(GAME_ONE);
        let pipeline = Pipeline::new(Arc::new(fetcher));

        let review = pipeline.submit(REVIEW_ONE).await.unwrap();
        assert_eq!(review.game, "One");
        assert_eq!(review.image, None);
        assert!(!pipeline.is_busy());
        assert_eq!(pipeline.current_phase(), Phase::Done);
    }

    #[tokio::test]
    async fn unextractable_page_fails_the_run() {
        let fetcher =
            FakeFetcher::default().with_page(REVIEW_ONE, "<html><body>redesigned</body></html>");
        let pipeline = Pipeline::new(Arc::new(fetcher));

        assert_eq!(pipeline.submit(REVIEW_ONE).await, None);
        assert_eq!(pipeline.current_phase(), Phase::Failed);
        assert!(!pipeline.is_busy());
    }

    #[tokio::test]
    async fn latest_run_wins() {
        let (fetcher, started, release) = FakeFetcher::default()
            .with_page(REVIEW_ONE, review_html("/games/one", "One"))
            .with_page(GAME_ONE, GAME_HTML)
            .with_page(REVIEW_TWO, review_html("/games/two", "Two"))
            .with_page(GAME_TWO, GAME_HTML)
            .with_gate(REVIEW_ONE);
        let pipeline = Arc::new(Pipeline::new(Arc::new(fetcher)));

        let first = {
            let pipeline = pipeline.clone();
            tokio::spawn(async move { pipeline.submit(REVIEW_ONE).await })
        };
        started.notified().await;

        let second = pipeline.submit(REVIEW_TWO).await.unwrap();
        assert_eq!(second.game, "Two");

        // Let the superseded run finish; its result must not surface.
        release.notify_one();
        assert_eq!(first.await.unwrap(), None);

        assert_eq!(pipeline.current().unwrap().game, "Two");
        assert!(!pipeline.is_busy());
    }
}
