//! Snapshot codec: live traversal state to and from a transportable value.
//!
//! A snapshot is a pure value with no references into driver state, so a
//! caller may serialize it, mutate it, or hold it indefinitely. Restoration
//! is defensive: a corrupted, truncated, or adversarially-crafted snapshot
//! degrades field by field instead of failing resume, and the rebuilt state
//! always makes forward progress.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::types::{PageResult, QueueItem};
use crate::urlnorm;

/// Wire form of a pending frontier entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotItem {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_url: Option<String>,
    /// Stored as `f64` so damaged snapshots (NaN, negatives, infinities)
    /// still deserialize and get clamped on resume.
    #[serde(default)]
    pub depth: f64,
    #[serde(default)]
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_text: Option<String>,
}

impl From<&QueueItem> for SnapshotItem {
    fn from(item: &QueueItem) -> Self {
        Self {
            url: item.url.clone(),
            parent_url: item.parent_url.clone(),
            depth: item.depth as f64,
            score: item.score,
            anchor_text: item.anchor_text.clone(),
        }
    }
}

/// The sole persisted representation of an in-progress traversal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrawlSnapshot {
    #[serde(default)]
    pub frontier: Vec<SnapshotItem>,
    #[serde(default)]
    pub visited: Vec<String>,
    #[serde(default)]
    pub results: Vec<PageResult>,
    #[serde(default)]
    pub enqueued_pages: usize,
    #[serde(default)]
    pub completed: bool,
}

impl CrawlSnapshot {
    /// Deep-copy live state into a snapshot value.
    pub(crate) fn capture(
        pending: Vec<QueueItem>,
        visited: &HashSet<String>,
        results: &[PageResult],
        enqueued_pages: usize,
        completed: bool,
    ) -> Self {
        let mut visited: Vec<String> = visited.iter().cloned().collect();
        visited.sort_unstable();
        Self {
            frontier: pending.iter().map(SnapshotItem::from).collect(),
            visited,
            results: results.to_vec(),
            enqueued_pages,
            completed,
        }
    }
}

/// Traversal state rebuilt from a snapshot, or seeded fresh.
#[derive(Debug)]
pub(crate) struct RestoredState {
    pub frontier: Vec<QueueItem>,
    pub visited: HashSet<String>,
    pub results: Vec<PageResult>,
    pub enqueued_pages: usize,
    /// True when no prior results survived restoration. The best-first
    /// driver forces the seed's score to infinity in this case.
    pub fresh: bool,
}

/// Rebuild live traversal state, normalizing every field defensively.
pub(crate) fn restore(
    snapshot: Option<&CrawlSnapshot>,
    seed_url: &str,
    max_depth: usize,
    max_pages: usize,
) -> RestoredState {
    let Some(snapshot) = snapshot else {
        return RestoredState {
            frontier: vec![QueueItem::seed(seed_url)],
            visited: HashSet::from([seed_url.to_string()]),
            results: Vec::new(),
            enqueued_pages: 1,
            fresh: true,
        };
    };

    let mut frontier = Vec::with_capacity(snapshot.frontier.len());
    for item in &snapshot.frontier {
        let Some(url) = urlnorm::normalize(&item.url) else {
            log::debug!(
                target: "mdcrawl::checkpoint",
                "dropping frontier entry with unusable URL: {}",
                item.url
            );
            continue;
        };
        let depth = if item.depth.is_finite() {
            (item.depth.max(0.0) as usize).min(max_depth)
        } else {
            0
        };
        let score = if item.score.is_finite() { item.score } else { 0.0 };
        let anchor_text = item
            .anchor_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string);
        frontier.push(QueueItem {
            url,
            parent_url: item.parent_url.clone(),
            depth,
            score,
            anchor_text,
        });
    }

    let mut results: Vec<PageResult> = snapshot
        .results
        .iter()
        .filter(|result| urlnorm::normalize(&result.url).is_some())
        .cloned()
        .collect();
    results.truncate(max_pages);

    let mut visited = HashSet::new();
    for entry in &snapshot.visited {
        if let Some(url) = urlnorm::normalize(entry) {
            visited.insert(url);
        }
    }
    for item in &frontier {
        visited.insert(item.url.clone());
    }
    for result in &results {
        if let Some(url) = urlnorm::normalize(&result.url) {
            visited.insert(url);
        }
    }
    visited.insert(seed_url.to_string());

    let fresh = results.is_empty();
    if frontier.is_empty() && results.is_empty() {
        // Nothing usable survived; start over from the seed.
        frontier.push(QueueItem::seed(seed_url));
    }

    let enqueued_pages = snapshot
        .enqueued_pages
        .max(visited.len())
        .max(frontier.len() + results.len())
        .max(1);

    log::debug!(
        target: "mdcrawl::checkpoint",
        "restored state: frontier={}, visited={}, results={}, enqueued={}",
        frontier.len(),
        visited.len(),
        results.len(),
        enqueued_pages
    );

    RestoredState {
        frontier,
        visited,
        results,
        enqueued_pages,
        fresh,
    }
}
