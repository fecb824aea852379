//! Crawler module for sitemap walking and page mirroring
//!
//! This module contains the core mirroring pipeline, including:
//! - HTTP fetching with a fixed-backoff retry state machine
//! - Sitemap index / URL set decoding
//! - Recursive sitemap walking with per-branch error isolation
//! - The worker pool that fetches and stores every queued URL

mod coordinator;
mod fetcher;
mod retry;
mod sitemap;
mod walker;

pub use coordinator::{run_crawl, Coordinator, CrawlSummary};
pub use fetcher::{build_http_client, FetchError, FetchResult, FetchedPage, Fetcher, UserAgentPool};
pub use retry::{
    classify_status, classify_transport, AttemptOutcome, RetryPolicy, RetryState, Transition,
};
pub use sitemap::SitemapDocument;
pub use walker::{WalkError, WalkStats, Walker};
