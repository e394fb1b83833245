//! Crawl engine for a URL-to-Markdown conversion service.
//!
//! This crate implements the traversal core of the service: an explicit
//! frontier with breadth-first and best-first disciplines, a composable
//! admission-filter pipeline, pluggable relevance scoring, link discovery
//! with per-run deduplication, and a checkpoint/resume protocol that
//! tolerates corrupted saved state.
//!
//! Page retrieval, HTML-to-Markdown conversion, caching, and the HTTP
//! surface live outside this crate; the engine reaches them through the
//! [`PageFetcher`] trait and the result/checkpoint hooks on [`CrawlConfig`].

pub mod config;
pub mod crawl_engine;
pub mod filters;
pub mod page_links;
pub mod scoring;
pub mod urlnorm;

pub use config::{CrawlConfig, CrawlStrategy};
pub use crawl_engine::{
    BestFirstFrontier, CrawlError, CrawlOutcome, CrawlSnapshot, CrawlStats, Crawler, FetchContext,
    FetchedPage, FifoFrontier, Frontier, PageFetcher, PageResult, QueueItem, SnapshotItem,
    StopSignal,
};
pub use filters::{ContentTypeFilter, DomainFilter, FilterChain, FilterContext, UrlFilter, UrlPatternFilter};
pub use page_links::{DiscoveredLink, extract_links};
pub use scoring::{CompositeScorer, KeywordScorer, ScoreContext, UrlScorer};

use std::sync::Arc;

/// Run a crawl to completion with the given configuration and fetcher.
pub async fn crawl(
    config: CrawlConfig,
    fetcher: Arc<dyn PageFetcher>,
) -> Result<CrawlOutcome, CrawlError> {
    Crawler::new(config, fetcher).run().await
}
