//! Core data types shared across the crawl engine.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::checkpoint::CrawlSnapshot;

/// Fatal crawl failures.
///
/// Per-page problems (fetch errors, filter rejections) are recorded on
/// [`PageResult`] and never surface here; a run fails only for an invalid
/// seed or a cancellation signal.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid seed URL: {0}")]
    InvalidSeed(String),
    #[error("crawl aborted by cancellation signal")]
    Cancelled,
}

/// Error string recorded when the page-level filter chain rejects a page.
pub const FILTER_REJECTED_ERROR: &str = "Filtered by active filter chain.";

/// Pending unit of work. Owned exclusively by the frontier while queued;
/// popping turns it into exactly one [`PageResult`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueueItem {
    pub url: String,
    pub parent_url: Option<String>,
    pub depth: usize,
    pub score: f64,
    pub anchor_text: Option<String>,
}

impl QueueItem {
    /// A depth-0, score-0 item with no parent.
    #[must_use]
    pub fn seed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

/// One record per attempted page, appended in completion order and
/// immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_url: Option<String>,
    #[serde(default)]
    pub depth: usize,
    #[serde(default)]
    pub score: f64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default)]
    pub links_discovered: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageResult {
    pub(crate) fn failed(item: &QueueItem, error: String) -> Self {
        Self {
            url: item.url.clone(),
            parent_url: item.parent_url.clone(),
            depth: item.depth,
            score: item.score,
            success: false,
            title: None,
            markdown: None,
            method: None,
            links_discovered: 0,
            error: Some(error),
        }
    }
}

/// Run statistics derived from the final result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlStats {
    pub crawled_pages: usize,
    pub succeeded_pages: usize,
    pub failed_pages: usize,
    pub enqueued_pages: usize,
    pub visited_pages: usize,
}

impl CrawlStats {
    /// Derive statistics from a result list and the driver's counters.
    #[must_use]
    pub fn aggregate(results: &[PageResult], enqueued_pages: usize, visited_pages: usize) -> Self {
        let succeeded_pages = results.iter().filter(|result| result.success).count();
        Self {
            crawled_pages: results.len(),
            succeeded_pages,
            failed_pages: results.len() - succeeded_pages,
            enqueued_pages,
            visited_pages,
        }
    }
}

/// A fetched page as produced by the external retrieval collaborator.
#[derive(Debug, Clone, Default)]
pub struct FetchedPage {
    /// Final URL of the page, after any redirects the fetcher followed.
    pub url: String,
    pub html: String,
    pub title: Option<String>,
    /// Output of the external HTML-to-Markdown pipeline, when the fetcher
    /// ran it; recorded verbatim on the result node.
    pub markdown: Option<String>,
    /// Retrieval method, e.g. `"static"` or `"browser"`.
    pub method: Option<String>,
    pub content_type: Option<String>,
}

/// Context handed to the fetcher alongside the URL.
#[derive(Debug, Clone, Default)]
pub struct FetchContext {
    pub depth: usize,
    pub parent_url: Option<String>,
}

/// External page retrieval.
///
/// Errors are captured as failed result nodes and never propagated past
/// the driver.
pub trait PageFetcher: Send + Sync {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        ctx: FetchContext,
    ) -> BoxFuture<'a, anyhow::Result<FetchedPage>>;
}

/// Hook awaited after every appended result, successful or failed.
pub type ResultHook = Arc<dyn Fn(PageResult) -> BoxFuture<'static, ()> + Send + Sync>;

/// Hook awaited whenever a checkpoint snapshot is due.
pub type CheckpointHook = Arc<dyn Fn(CrawlSnapshot) -> BoxFuture<'static, ()> + Send + Sync>;

/// Cooperative cancellation shared between a caller and a running crawl.
///
/// Checked at the top of every loop iteration; once triggered, the run
/// fails with [`CrawlError::Cancelled`] and in-memory state is abandoned.
/// Callers wanting a clean stop should rely on the last emitted checkpoint.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_aggregate_partitions_results() {
        let ok = PageResult {
            url: "https://a.test/".into(),
            parent_url: None,
            depth: 0,
            score: 0.0,
            success: true,
            title: None,
            markdown: None,
            method: None,
            links_discovered: 2,
            error: None,
        };
        let failed = PageResult::failed(&QueueItem::seed("https://b.test/"), "boom".into());
        let stats = CrawlStats::aggregate(&[ok, failed], 7, 4);
        assert_eq!(stats.crawled_pages, 2);
        assert_eq!(stats.succeeded_pages, 1);
        assert_eq!(stats.failed_pages, 1);
        assert_eq!(stats.enqueued_pages, 7);
        assert_eq!(stats.visited_pages, 4);
    }

    #[test]
    fn stop_signal_is_shared() {
        let signal = StopSignal::new();
        let clone = signal.clone();
        assert!(!clone.is_triggered());
        signal.trigger();
        assert!(clone.is_triggered());
    }

    #[test]
    fn page_result_round_trips_through_json() {
        let node = PageResult {
            url: "https://a.test/".into(),
            parent_url: Some("https://a.test/parent".into()),
            depth: 1,
            score: 2.5,
            success: true,
            title: Some("A".into()),
            markdown: Some("# A".into()),
            method: Some("static".into()),
            links_discovered: 3,
            error: None,
        };
        let json = serde_json::to_string(&node).unwrap();
        let back: PageResult = serde_json::from_str(&json).unwrap();
        assert_eq!(node, back);
    }
}
