//! The sequential traversal driver shared by breadth-first and best-first
//! crawling.
//!
//! One driver instance owns its frontier, visited set, and result list for
//! the whole run; nothing is shared with a concurrently running crawl
//! unless the caller shares a filter chain or scorer, both read-only.
//! Traversal never fetches concurrently: the fetcher call, every filter and
//! scorer invocation, and the result/checkpoint hooks are awaited in-line
//! before the loop advances.

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, info, warn};

use super::checkpoint::{self, CrawlSnapshot};
use super::frontier::{BestFirstFrontier, FifoFrontier, Frontier};
use super::types::{
    CrawlError, CrawlStats, FILTER_REJECTED_ERROR, FetchContext, PageFetcher, PageResult,
    QueueItem,
};
use crate::config::{CrawlConfig, CrawlStrategy};
use crate::filters::FilterContext;
use crate::page_links;
use crate::scoring::ScoreContext;
use crate::urlnorm;

/// Everything a finished run hands back to the caller.
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub results: Vec<PageResult>,
    pub stats: CrawlStats,
}

/// Mutable per-run state, owned exclusively by the driver.
struct RunState {
    visited: HashSet<String>,
    results: Vec<PageResult>,
    enqueued_pages: usize,
    processed: usize,
}

impl RunState {
    fn stats(&self) -> CrawlStats {
        CrawlStats::aggregate(&self.results, self.enqueued_pages, self.visited.len())
    }
}

/// Sequential traversal driver over a [`PageFetcher`].
pub struct Crawler {
    config: CrawlConfig,
    fetcher: Arc<dyn PageFetcher>,
}

impl Crawler {
    #[must_use]
    pub fn new(config: CrawlConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { config, fetcher }
    }

    /// Run the traversal to completion, budget exhaustion, or cancellation.
    pub async fn run(&self) -> Result<CrawlOutcome, CrawlError> {
        let seed_url = urlnorm::normalize(self.config.seed_url())
            .ok_or_else(|| CrawlError::InvalidSeed(self.config.seed_url().to_string()))?;
        let seed_host = urlnorm::host_of(&seed_url).unwrap_or_default();

        let max_depth = self.config.max_depth();
        let max_pages = self.config.max_pages();

        let restored =
            checkpoint::restore(self.config.initial_state(), &seed_url, max_depth, max_pages);
        let mut run = RunState {
            visited: restored.visited,
            results: restored.results,
            enqueued_pages: restored.enqueued_pages,
            processed: 0,
        };
        let mut frontier = self.build_frontier(restored.frontier, restored.fresh, &seed_url);

        info!(
            target: "mdcrawl::engine",
            "starting {:?} crawl of {seed_url}: max_depth={max_depth}, max_pages={max_pages}, frontier={}, prior_results={}",
            self.config.strategy(),
            frontier.len(),
            run.results.len()
        );

        while run.results.len() < max_pages {
            if let Some(signal) = self.config.stop_signal()
                && signal.is_triggered()
            {
                warn!(
                    target: "mdcrawl::engine",
                    "crawl of {seed_url} cancelled after {} pages",
                    run.results.len()
                );
                return Err(CrawlError::Cancelled);
            }
            let Some(item) = frontier.pop() else { break };

            debug!(
                target: "mdcrawl::engine",
                "crawling [depth {}]: {}",
                item.depth,
                item.url
            );

            let fetch_ctx = FetchContext {
                depth: item.depth,
                parent_url: item.parent_url.clone(),
            };
            let fetched = match self.fetcher.fetch(&item.url, fetch_ctx).await {
                Ok(page) => page,
                Err(e) => {
                    debug!(target: "mdcrawl::engine", "fetch failed for {}: {e:#}", item.url);
                    let node = PageResult::failed(&item, format!("{e:#}"));
                    self.record(&mut run, frontier.as_ref(), node).await;
                    continue;
                }
            };

            let page_ctx = FilterContext {
                url: item.url.clone(),
                depth: item.depth,
                parent_url: item.parent_url.clone(),
                seed_host: seed_host.clone(),
                content_type: fetched.content_type.clone(),
            };
            if !self.config.filter_chain().test(&item.url, &page_ctx).await {
                debug!(target: "mdcrawl::engine", "page rejected by filter chain: {}", item.url);
                let node = PageResult::failed(&item, FILTER_REJECTED_ERROR.to_string());
                self.record(&mut run, frontier.as_ref(), node).await;
                continue;
            }

            let mut links_discovered = 0usize;
            // Skip discovery when this result consumes the final budget slot.
            if item.depth < max_depth && run.results.len() + 1 < max_pages {
                let base = if fetched.url.is_empty() {
                    item.url.as_str()
                } else {
                    fetched.url.as_str()
                };
                for link in page_links::extract_links(&fetched.html, base) {
                    if run.visited.contains(&link.url) {
                        continue;
                    }
                    if !self.config.include_external()
                        && urlnorm::host_of(&link.url).as_deref() != Some(seed_host.as_str())
                    {
                        continue;
                    }
                    let child_depth = item.depth + 1;
                    let child_ctx = FilterContext {
                        url: link.url.clone(),
                        depth: child_depth,
                        parent_url: Some(item.url.clone()),
                        seed_host: seed_host.clone(),
                        content_type: None,
                    };
                    if !self.config.filter_chain().test(&link.url, &child_ctx).await {
                        continue;
                    }
                    let score = match self.config.scorer() {
                        Some(scorer) => {
                            let score_ctx = ScoreContext {
                                depth: child_depth,
                                parent_url: Some(item.url.clone()),
                                anchor_text: link.anchor_text.clone(),
                            };
                            scorer.score(&link.url, &score_ctx).await
                        }
                        None => 0.0,
                    };
                    if let Some(threshold) = self.config.score_threshold()
                        && score < threshold
                    {
                        // Below threshold: never visited, never counted.
                        continue;
                    }
                    run.visited.insert(link.url.clone());
                    debug!(
                        target: "mdcrawl::links",
                        "enqueueing [depth {child_depth}, score {score}]: {}",
                        link.url
                    );
                    frontier.push(QueueItem {
                        url: link.url,
                        parent_url: Some(item.url.clone()),
                        depth: child_depth,
                        score,
                        anchor_text: link.anchor_text,
                    });
                    links_discovered += 1;
                    run.enqueued_pages += 1;
                }
            }

            let node = PageResult {
                url: item.url.clone(),
                parent_url: item.parent_url.clone(),
                depth: item.depth,
                score: item.score,
                success: true,
                title: fetched.title,
                markdown: fetched.markdown,
                method: fetched.method,
                links_discovered,
                error: None,
            };
            self.record(&mut run, frontier.as_ref(), node).await;
        }

        let stats = run.stats();
        info!(
            target: "mdcrawl::engine",
            "crawl of {seed_url} finished: {} crawled, {} failed, {} enqueued",
            stats.crawled_pages,
            stats.failed_pages,
            stats.enqueued_pages
        );

        // The finishing snapshot is emitted exactly once, regardless of cadence.
        if let Some(hook) = self.config.checkpoint_hook() {
            let snapshot = CrawlSnapshot::capture(
                frontier.pending(),
                &run.visited,
                &run.results,
                run.enqueued_pages,
                true,
            );
            hook(snapshot).await;
        }

        Ok(CrawlOutcome {
            results: run.results,
            stats,
        })
    }

    fn build_frontier(
        &self,
        mut items: Vec<QueueItem>,
        fresh: bool,
        seed_url: &str,
    ) -> Box<dyn Frontier> {
        match self.config.strategy() {
            CrawlStrategy::BreadthFirst => Box::new(FifoFrontier::from_items(items)),
            CrawlStrategy::BestFirst => {
                if fresh {
                    // The seed goes first on a fresh run, whatever the scorer
                    // would say about it.
                    for item in &mut items {
                        if item.url == seed_url {
                            item.score = f64::INFINITY;
                        }
                    }
                }
                Box::new(BestFirstFrontier::from_items(items))
            }
        }
    }

    /// Append a result node, then run the per-result hook and any due
    /// checkpoint. Failed nodes count as processed items exactly like
    /// successful ones.
    async fn record(&self, run: &mut RunState, frontier: &dyn Frontier, node: PageResult) {
        run.results.push(node.clone());
        run.processed += 1;
        if let Some(hook) = self.config.result_hook() {
            hook(node).await;
        }
        if let Some(hook) = self.config.checkpoint_hook()
            && let Some(every) = self.config.checkpoint_every()
            && every > 0
            && run.processed % every == 0
        {
            debug!(
                target: "mdcrawl::checkpoint",
                "emitting checkpoint after {} processed items",
                run.processed
            );
            let snapshot = CrawlSnapshot::capture(
                frontier.pending(),
                &run.visited,
                &run.results,
                run.enqueued_pages,
                false,
            );
            hook(snapshot).await;
        }
    }
}
