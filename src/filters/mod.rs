//! Composable admission filtering for crawl candidates.
//!
//! A [`FilterChain`] is an ordered, immutable list of predicates evaluated
//! with short-circuiting. Chains are persistent: `add` returns a new chain
//! sharing structure with the old one, so a base chain can be extended per
//! candidate without copying and without affecting other holders.

mod builtin;

pub use builtin::{ContentTypeFilter, DomainFilter, UrlPatternFilter};

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;

/// Everything a predicate may consult when judging a candidate URL.
#[derive(Debug, Clone, Default)]
pub struct FilterContext {
    pub url: String,
    pub depth: usize,
    pub parent_url: Option<String>,
    /// Host of the seed URL, for scope-aware predicates.
    pub seed_host: String,
    /// Known content type, if the page has already been fetched. `None`
    /// before fetch, when candidates get the benefit of the doubt.
    pub content_type: Option<String>,
}

/// A single admission predicate.
///
/// Implementations must be side-effect free so a chain can be shared
/// read-only across many candidate evaluations and across runs.
pub trait UrlFilter: Send + Sync {
    fn admit<'a>(&'a self, url: &'a str, ctx: &'a FilterContext) -> BoxFuture<'a, bool>;
}

struct ChainNode {
    filter: Arc<dyn UrlFilter>,
    prev: Option<Arc<ChainNode>>,
}

/// Ordered, immutable admission pipeline with short-circuit evaluation.
#[derive(Clone, Default)]
pub struct FilterChain {
    head: Option<Arc<ChainNode>>,
    len: usize,
}

impl FilterChain {
    /// An empty chain, which admits everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a new chain with `filter` appended. The receiver is untouched.
    #[must_use]
    pub fn add<F: UrlFilter + 'static>(&self, filter: F) -> Self {
        self.add_shared(Arc::new(filter))
    }

    /// Like [`FilterChain::add`] for an already-shared filter.
    #[must_use]
    pub fn add_shared(&self, filter: Arc<dyn UrlFilter>) -> Self {
        Self {
            head: Some(Arc::new(ChainNode {
                filter,
                prev: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Evaluate predicates in insertion order.
    ///
    /// Returns `false` the moment any predicate rejects; later predicates
    /// are not invoked. `true` when the chain is empty or every predicate
    /// admits.
    pub async fn test(&self, url: &str, ctx: &FilterContext) -> bool {
        // Nodes link newest-first; walk back then replay in insertion order.
        let mut nodes = Vec::with_capacity(self.len);
        let mut cursor = self.head.as_deref();
        while let Some(node) = cursor {
            nodes.push(node);
            cursor = node.prev.as_deref();
        }
        for node in nodes.into_iter().rev() {
            if !node.filter.admit(url, ctx).await {
                return false;
            }
        }
        true
    }
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain").field("len", &self.len).finish()
    }
}
