//! Recursive sitemap walker
//!
//! The walker resolves one sitemap URL into a stream of filtered page URLs.
//! Sitemap indexes are descended depth-first, one child at a time; the
//! concurrency of the mirror lives in the worker pool, not here. A failing
//! child is logged and counted, and its siblings are still walked.

use crate::crawler::fetcher::{FetchError, Fetcher};
use crate::crawler::sitemap::SitemapDocument;
use crate::url::{Filter, Verdict};
use crate::UrlError;
use futures::future::BoxFuture;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::Sender;

/// Errors that end one branch of the walk
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("Invalid sitemap URL: {0}")]
    Url(#[from] UrlError),

    #[error("Failed to fetch sitemap: {0}")]
    Fetch(#[from] FetchError),

    #[error("Unable to determine sitemap type for {url}")]
    Unrecognized { url: String },
}

/// Counters collected while walking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Sitemap documents fetched and decoded
    pub sitemaps: usize,

    /// Page URLs handed to the download queue
    pub queued: usize,

    /// Sitemap or page URLs rejected by the filter or unparseable
    pub skipped: usize,

    /// Child sitemaps whose walk failed
    pub failed_branches: usize,
}

impl WalkStats {
    /// Adds another branch's counters to this one
    pub fn merge(&mut self, other: &WalkStats) {
        self.sitemaps += other.sitemaps;
        self.queued += other.queued;
        self.skipped += other.skipped;
        self.failed_branches += other.failed_branches;
    }

    fn skipped_one() -> Self {
        Self {
            skipped: 1,
            ..Self::default()
        }
    }
}

/// Walks sitemap trees and feeds page URLs into a queue
pub struct Walker {
    fetcher: Fetcher,
    filter: Arc<Filter>,
    limit: usize,
}

impl Walker {
    /// Creates a walker
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Fetcher used for sitemap documents
    /// * `filter` - Filter applied to sitemap and page URLs
    /// * `limit` - Maximum URLs queued from one URL-set document (0 = unlimited)
    pub fn new(fetcher: Fetcher, filter: Arc<Filter>, limit: usize) -> Self {
        Self {
            fetcher,
            filter,
            limit,
        }
    }

    /// Walks a sitemap and every sitemap reachable from it
    ///
    /// Filtered page URLs are sent to `sink` in document order. A URL that
    /// the filter rejects is skipped without error.
    ///
    /// # Returns
    ///
    /// * `Ok(WalkStats)` - The sitemap was skipped or walked; child failures are counted, not returned
    /// * `Err(WalkError)` - This sitemap could not be parsed, fetched, or decoded
    pub fn walk<'a>(
        &'a self,
        url: &'a str,
        sink: &'a Sender<String>,
    ) -> BoxFuture<'a, Result<WalkStats, WalkError>> {
        Box::pin(async move {
            if sink.is_closed() {
                return Ok(WalkStats::default());
            }

            let url = self.filter.normalize(url);
            match self.filter.classify(&url)? {
                Verdict::Include => {}
                verdict => {
                    tracing::debug!("Skipping sitemap {} ({:?})", url, verdict);
                    return Ok(WalkStats::skipped_one());
                }
            }

            tracing::info!("Fetching sitemap: {}", url);
            let page = self.fetcher.fetch(&url).await?;

            let mut stats = WalkStats {
                sitemaps: 1,
                ..WalkStats::default()
            };

            match SitemapDocument::decode(&page.body) {
                Some(SitemapDocument::Index(children)) => {
                    tracing::info!(
                        "Parsed sitemap as a sitemap index ({} children): {}",
                        children.len(),
                        url
                    );
                    for child in &children {
                        match self.walk(child, sink).await {
                            Ok(child_stats) => stats.merge(&child_stats),
                            Err(e) => {
                                tracing::warn!("Error walking child sitemap {}: {}", child, e);
                                stats.failed_branches += 1;
                            }
                        }
                    }
                }
                Some(SitemapDocument::UrlSet(locs)) => {
                    tracing::info!(
                        "Parsed sitemap as a URL set ({} entries): {}",
                        locs.len(),
                        url
                    );
                    stats.merge(&self.emit(&url, &locs, sink).await);
                }
                None => {
                    tracing::warn!("Unable to determine sitemap type for {}", url);
                    return Err(WalkError::Unrecognized { url });
                }
            }

            Ok(stats)
        })
    }

    /// Filters the entries of one URL set and queues the survivors
    async fn emit(&self, sitemap: &str, locs: &[String], sink: &Sender<String>) -> WalkStats {
        let mut stats = WalkStats::default();

        for (i, loc) in locs.iter().enumerate() {
            if self.limit > 0 && stats.queued >= self.limit {
                tracing::debug!(
                    "Document limit of {} reached for {}, {} entries not examined",
                    self.limit,
                    sitemap,
                    locs.len() - i
                );
                break;
            }

            let url = self.filter.normalize(loc);
            match self.filter.classify(&url) {
                Ok(Verdict::Include) => {}
                Ok(verdict) => {
                    tracing::debug!("Skipping URL {} ({:?})", url, verdict);
                    stats.skipped += 1;
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Error parsing URL {}: {}", url, e);
                    stats.skipped += 1;
                    continue;
                }
            }

            if sink.send(url.clone()).await.is_err() {
                tracing::warn!("Download queue closed, dropping remaining URLs from {}", sitemap);
                break;
            }
            tracing::info!("Queued URL for download: {}", url);
            stats.queued += 1;
        }

        stats
    }
}
