//! Crawl configuration.
//!
//! A [`CrawlConfig`] is assembled with chained `with_*` calls and then
//! handed to the crawler, which reads it through the getters and never
//! mutates it.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;

use crate::crawl_engine::{
    CheckpointHook, CrawlSnapshot, PageResult, ResultHook, StopSignal,
};
use crate::filters::FilterChain;
use crate::scoring::UrlScorer;

pub const DEFAULT_MAX_DEPTH: usize = 3;
pub const DEFAULT_MAX_PAGES: usize = 100;

/// Which frontier discipline drives the traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CrawlStrategy {
    /// Layer-by-layer FIFO order.
    #[default]
    BreadthFirst,
    /// Highest-scored pending page first.
    BestFirst,
}

/// Configuration for a single crawl run.
#[derive(Clone)]
pub struct CrawlConfig {
    seed_url: String,
    strategy: CrawlStrategy,
    max_depth: usize,
    max_pages: usize,
    include_external: bool,
    filter_chain: FilterChain,
    scorer: Option<Arc<dyn UrlScorer>>,
    score_threshold: Option<f64>,
    initial_state: Option<CrawlSnapshot>,
    checkpoint_every: Option<usize>,
    result_hook: Option<ResultHook>,
    checkpoint_hook: Option<CheckpointHook>,
    stop_signal: Option<StopSignal>,
}

impl CrawlConfig {
    #[must_use]
    pub fn new(seed_url: impl Into<String>) -> Self {
        Self {
            seed_url: seed_url.into(),
            strategy: CrawlStrategy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_pages: DEFAULT_MAX_PAGES,
            include_external: false,
            filter_chain: FilterChain::new(),
            scorer: None,
            score_threshold: None,
            initial_state: None,
            checkpoint_every: None,
            result_hook: None,
            checkpoint_hook: None,
            stop_signal: None,
        }
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: CrawlStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// A budget of zero would never crawl anything, so it clamps to one.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Allow links whose host differs from the seed's host.
    #[must_use]
    pub fn with_include_external(mut self, include_external: bool) -> Self {
        self.include_external = include_external;
        self
    }

    #[must_use]
    pub fn with_filter_chain(mut self, chain: FilterChain) -> Self {
        self.filter_chain = chain;
        self
    }

    #[must_use]
    pub fn with_scorer(mut self, scorer: Arc<dyn UrlScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    /// Discovered links scoring below this value are silently dropped.
    /// The seed is enqueued before scoring and is never subject to it.
    #[must_use]
    pub fn with_score_threshold(mut self, threshold: f64) -> Self {
        self.score_threshold = Some(threshold);
        self
    }

    /// Resume from a previously captured snapshot.
    #[must_use]
    pub fn with_initial_state(mut self, snapshot: CrawlSnapshot) -> Self {
        self.initial_state = Some(snapshot);
        self
    }

    /// Emit a checkpoint snapshot every `every` processed pages. Zero
    /// disables cadence checkpoints; the finishing snapshot still fires.
    #[must_use]
    pub fn with_checkpoint_every(mut self, every: usize) -> Self {
        self.checkpoint_every = Some(every);
        self
    }

    /// Async callback awaited after every appended result node.
    #[must_use]
    pub fn with_on_result<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(PageResult) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.result_hook = Some(Arc::new(move |result| hook(result).boxed()));
        self
    }

    /// Async callback awaited with every checkpoint snapshot.
    #[must_use]
    pub fn with_on_checkpoint<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(CrawlSnapshot) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.checkpoint_hook = Some(Arc::new(move |snapshot| hook(snapshot).boxed()));
        self
    }

    #[must_use]
    pub fn with_stop_signal(mut self, signal: StopSignal) -> Self {
        self.stop_signal = Some(signal);
        self
    }

    #[must_use]
    pub fn seed_url(&self) -> &str {
        &self.seed_url
    }

    #[must_use]
    pub fn strategy(&self) -> CrawlStrategy {
        self.strategy
    }

    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    #[must_use]
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    #[must_use]
    pub fn include_external(&self) -> bool {
        self.include_external
    }

    #[must_use]
    pub fn filter_chain(&self) -> &FilterChain {
        &self.filter_chain
    }

    #[must_use]
    pub fn scorer(&self) -> Option<&Arc<dyn UrlScorer>> {
        self.scorer.as_ref()
    }

    #[must_use]
    pub fn score_threshold(&self) -> Option<f64> {
        self.score_threshold
    }

    #[must_use]
    pub fn initial_state(&self) -> Option<&CrawlSnapshot> {
        self.initial_state.as_ref()
    }

    #[must_use]
    pub fn checkpoint_every(&self) -> Option<usize> {
        self.checkpoint_every
    }

    #[must_use]
    pub fn result_hook(&self) -> Option<&ResultHook> {
        self.result_hook.as_ref()
    }

    #[must_use]
    pub fn checkpoint_hook(&self) -> Option<&CheckpointHook> {
        self.checkpoint_hook.as_ref()
    }

    #[must_use]
    pub fn stop_signal(&self) -> Option<&StopSignal> {
        self.stop_signal.as_ref()
    }
}

impl fmt::Debug for CrawlConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrawlConfig")
            .field("seed_url", &self.seed_url)
            .field("strategy", &self.strategy)
            .field("max_depth", &self.max_depth)
            .field("max_pages", &self.max_pages)
            .field("include_external", &self.include_external)
            .field("filter_chain", &self.filter_chain)
            .field("has_scorer", &self.scorer.is_some())
            .field("score_threshold", &self.score_threshold)
            .field("has_initial_state", &self.initial_state.is_some())
            .field("checkpoint_every", &self.checkpoint_every)
            .field("has_result_hook", &self.result_hook.is_some())
            .field("has_checkpoint_hook", &self.checkpoint_hook.is_some())
            .field("has_stop_signal", &self.stop_signal.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = CrawlConfig::new("https://docs.example.com");
        assert_eq!(config.seed_url(), "https://docs.example.com");
        assert_eq!(config.strategy(), CrawlStrategy::BreadthFirst);
        assert_eq!(config.max_depth(), DEFAULT_MAX_DEPTH);
        assert_eq!(config.max_pages(), DEFAULT_MAX_PAGES);
        assert!(!config.include_external());
        assert!(config.filter_chain().is_empty());
        assert!(config.scorer().is_none());
        assert!(config.score_threshold().is_none());
        assert!(config.checkpoint_every().is_none());
    }

    #[test]
    fn zero_page_budget_clamps_to_one() {
        let config = CrawlConfig::new("https://docs.example.com").with_max_pages(0);
        assert_eq!(config.max_pages(), 1);
    }

    #[test]
    fn builder_chains_accumulate() {
        let signal = StopSignal::new();
        let config = CrawlConfig::new("https://docs.example.com")
            .with_strategy(CrawlStrategy::BestFirst)
            .with_max_depth(5)
            .with_max_pages(20)
            .with_include_external(true)
            .with_score_threshold(0.25)
            .with_checkpoint_every(10)
            .with_stop_signal(signal.clone())
            .with_on_result(|_result| async {});
        assert_eq!(config.strategy(), CrawlStrategy::BestFirst);
        assert_eq!(config.max_depth(), 5);
        assert_eq!(config.max_pages(), 20);
        assert!(config.include_external());
        assert_eq!(config.score_threshold(), Some(0.25));
        assert_eq!(config.checkpoint_every(), Some(10));
        assert!(config.result_hook().is_some());
        assert!(config.stop_signal().is_some());
        signal.trigger();
        assert!(config.stop_signal().is_some_and(StopSignal::is_triggered));
    }

    #[test]
    fn debug_omits_callback_internals() {
        let config = CrawlConfig::new("https://docs.example.com")
            .with_on_checkpoint(|_snapshot| async {});
        let rendered = format!("{config:?}");
        assert!(rendered.contains("has_checkpoint_hook: true"));
        assert!(rendered.contains("has_result_hook: false"));
    }
}
