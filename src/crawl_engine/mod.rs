//! The traversal engine: frontier disciplines, the sequential drivers,
//! checkpoint/resume, and run statistics.

pub mod checkpoint;
pub mod driver;
pub mod frontier;
pub mod types;

pub use checkpoint::{CrawlSnapshot, SnapshotItem};
pub use driver::{CrawlOutcome, Crawler};
pub use frontier::{BestFirstFrontier, FifoFrontier, Frontier, priority_cmp};
pub use types::{
    CheckpointHook, CrawlError, CrawlStats, FILTER_REJECTED_ERROR, FetchContext, FetchedPage,
    PageFetcher, PageResult, QueueItem, ResultHook, StopSignal,
};
