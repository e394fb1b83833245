//! Pluggable relevance scoring for discovered links.
//!
//! Scorers are small capability objects with a single evaluation method,
//! composed by list rather than inheritance. The driver consults the
//! configured scorer once per candidate, before the score-threshold gate.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

/// Signals available when scoring a candidate URL.
#[derive(Debug, Clone, Default)]
pub struct ScoreContext {
    pub depth: usize,
    pub parent_url: Option<String>,
    pub anchor_text: Option<String>,
}

/// Relevance scoring capability. Must be side-effect free; a scorer may be
/// shared read-only across concurrent runs.
pub trait UrlScorer: Send + Sync {
    fn score<'a>(&'a self, url: &'a str, ctx: &'a ScoreContext) -> BoxFuture<'a, f64>;
}

/// Scores by counting configured keywords in the URL and anchor text.
///
/// Keywords are lower-cased, trimmed, and de-blanked at construction; the
/// score is the number of keywords found as substrings of
/// `"url anchor_text"` (case-insensitive) times the weight. No keywords
/// means every candidate scores zero.
pub struct KeywordScorer {
    keywords: Vec<String>,
    weight: f64,
}

impl KeywordScorer {
    #[must_use]
    pub fn new<I, S>(keywords: I, weight: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|keyword| keyword.as_ref().trim().to_lowercase())
                .filter(|keyword| !keyword.is_empty())
                .collect(),
            weight,
        }
    }
}

impl UrlScorer for KeywordScorer {
    fn score<'a>(&'a self, url: &'a str, ctx: &'a ScoreContext) -> BoxFuture<'a, f64> {
        if self.keywords.is_empty() {
            return futures::future::ready(0.0).boxed();
        }
        let haystack = format!("{url} {}", ctx.anchor_text.as_deref().unwrap_or("")).to_lowercase();
        let hits = self
            .keywords
            .iter()
            .filter(|keyword| haystack.contains(keyword.as_str()))
            .count();
        futures::future::ready(hits as f64 * self.weight).boxed()
    }
}

/// Sums the scores of its child scorers, combining signals additively.
#[derive(Default)]
pub struct CompositeScorer {
    scorers: Vec<Arc<dyn UrlScorer>>,
}

impl CompositeScorer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with<S: UrlScorer + 'static>(mut self, scorer: S) -> Self {
        self.scorers.push(Arc::new(scorer));
        self
    }

    pub fn push(&mut self, scorer: Arc<dyn UrlScorer>) {
        self.scorers.push(scorer);
    }
}

impl UrlScorer for CompositeScorer {
    fn score<'a>(&'a self, url: &'a str, ctx: &'a ScoreContext) -> BoxFuture<'a, f64> {
        async move {
            let mut total = 0.0;
            for scorer in &self.scorers {
                total += scorer.score(url, ctx).await;
            }
            total
        }
        .boxed()
    }
}
