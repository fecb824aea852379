//! Crawl coordinator - producer/consumer orchestration
//!
//! This module wires the pipeline together:
//! - One producer task walks the sitemap tree and queues page URLs
//! - A fixed pool of worker tasks drains the queue, fetching and storing each URL
//! - The queue is closed when the walk ends; workers exit once it is drained
//!
//! Workers keep their own tallies and hand them back when they finish, so
//! the only state shared between tasks is the queue itself.

use crate::config::Config;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::walker::{WalkStats, Walker};
use crate::storage::{FsStorage, Storage};
use crate::url::Filter;
use crate::MirrorError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Mutex};

/// Outcome of a complete crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Counters from the sitemap walk
    pub walk: WalkStats,

    /// Documents written to storage
    pub stored: usize,

    /// URLs abandoned because the fetch failed
    pub fetch_failed: usize,

    /// URLs fetched but not persisted
    pub store_failed: usize,
}

impl CrawlSummary {
    /// URLs taken off the queue by workers
    pub fn processed(&self) -> usize {
        self.stored + self.fetch_failed + self.store_failed
    }
}

/// Per-worker counters
#[derive(Debug, Default)]
struct WorkerTally {
    stored: usize,
    fetch_failed: usize,
    store_failed: usize,
}

/// One consumer of the download queue
struct Worker {
    id: usize,
    queue: Arc<Mutex<mpsc::Receiver<String>>>,
    fetcher: Fetcher,
    storage: Arc<dyn Storage>,
    pacing: Option<Duration>,
}

impl Worker {
    async fn run(self) -> WorkerTally {
        tracing::debug!("Worker {} started", self.id);
        let mut tally = WorkerTally::default();

        loop {
            let next = {
                let mut queue = self.queue.lock().await;
                queue.recv().await
            };

            let Some(url) = next else {
                break;
            };

            self.process(url, &mut tally).await;

            if let Some(delay) = self.pacing {
                tokio::time::sleep(delay).await;
            }
        }

        tracing::debug!("Worker {} finished: {:?}", self.id, tally);
        tally
    }

    async fn process(&self, url: String, tally: &mut WorkerTally) {
        tracing::info!("Downloading document: {}", url);

        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Error downloading document: {}", e);
                tally.fetch_failed += 1;
                return;
            }
        };

        let storage = Arc::clone(&self.storage);
        let target = url.clone();
        let stored =
            tokio::task::spawn_blocking(move || storage.store(&target, &page.body)).await;

        match stored {
            Ok(Ok(path)) => {
                tracing::info!("Successfully saved {} to {}", url, path.display());
                tally.stored += 1;
            }
            Ok(Err(e)) => {
                tracing::warn!("Error writing {}: {}", url, e);
                tally.store_failed += 1;
            }
            Err(e) => {
                tracing::warn!("Storage task for {} failed: {}", url, e);
                tally.store_failed += 1;
            }
        }
    }
}

/// Main crawl coordinator structure
pub struct Coordinator {
    sitemap_url: String,
    workers: usize,
    pacing: Option<Duration>,
    walker: Arc<Walker>,
    fetcher: Fetcher,
    storage: Arc<dyn Storage>,
}

impl Coordinator {
    /// Creates a coordinator that writes into the configured output directory
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(MirrorError)` - The filter pattern or HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self, MirrorError> {
        let filter = Filter::new(&config.filter)?;
        let storage = FsStorage::new(&config.output.base_dir, config.output.index_file.clone());
        Self::with_parts(config, filter, Arc::new(storage))
    }

    /// Creates a coordinator from an explicit filter and storage backend
    pub fn with_parts(
        config: &Config,
        filter: Filter,
        storage: Arc<dyn Storage>,
    ) -> Result<Self, MirrorError> {
        let fetcher = Fetcher::new(&config.fetcher)?;
        let walker = Walker::new(
            fetcher.clone(),
            Arc::new(filter),
            config.crawler.document_limit,
        );

        let pacing = config
            .crawler
            .rate_limit
            .then(|| Duration::from_millis(config.crawler.rate_limit_delay_ms));

        Ok(Self {
            sitemap_url: config.crawler.sitemap_url.clone(),
            workers: config.crawler.workers.max(1),
            pacing,
            walker: Arc::new(walker),
            fetcher,
            storage,
        })
    }

    /// Runs the crawl to completion
    ///
    /// The walk and the downloads run concurrently. The crawl ends when the
    /// walk has finished and every queued URL has been processed.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSummary)` - Crawl finished; per-URL and per-branch failures are counted
    /// * `Err(MirrorError::RootSitemap)` - The root sitemap could not be fetched or decoded
    pub async fn run(&self) -> Result<CrawlSummary, MirrorError> {
        let start_time = Instant::now();
        tracing::info!(
            "Starting mirror of {} with {} workers",
            self.sitemap_url,
            self.workers
        );

        let (tx, rx) = mpsc::channel::<String>(self.workers);
        let queue = Arc::new(Mutex::new(rx));

        let handles: Vec<_> = (0..self.workers)
            .map(|id| {
                let worker = Worker {
                    id,
                    queue: Arc::clone(&queue),
                    fetcher: self.fetcher.clone(),
                    storage: Arc::clone(&self.storage),
                    pacing: self.pacing,
                };
                tokio::spawn(worker.run())
            })
            .collect();

        let walker = Arc::clone(&self.walker);
        let root = self.sitemap_url.clone();
        let producer = tokio::spawn(async move {
            let result = walker.walk(&root, &tx).await;
            drop(tx);
            result
        });

        let walk = match producer.await? {
            Ok(stats) => stats,
            Err(source) => {
                for handle in &handles {
                    handle.abort();
                }
                return Err(MirrorError::RootSitemap {
                    url: self.sitemap_url.clone(),
                    source,
                });
            }
        };

        let mut summary = CrawlSummary {
            walk,
            ..CrawlSummary::default()
        };
        for handle in handles {
            let tally = handle.await?;
            summary.stored += tally.stored;
            summary.fetch_failed += tally.fetch_failed;
            summary.store_failed += tally.store_failed;
        }

        tracing::info!(
            "Mirror finished in {:?}: {} sitemaps, {} queued, {} skipped, {} failed branches, {} stored, {} fetch failures, {} write failures",
            start_time.elapsed(),
            summary.walk.sitemaps,
            summary.walk.queued,
            summary.walk.skipped,
            summary.walk.failed_branches,
            summary.stored,
            summary.fetch_failed,
            summary.store_failed
        );

        Ok(summary)
    }
}

/// Runs a complete mirror with the given configuration
///
/// # Example
///
/// ```no_run
/// use docs_mirror::config::Config;
/// use docs_mirror::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = run_crawl(&Config::default()).await?;
/// println!("Stored {} documents", summary.stored);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<CrawlSummary, MirrorError> {
    Coordinator::new(config)?.run().await
}
