//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the mirror, including:
//! - Building one pooled HTTP client from the fetcher configuration
//! - Rotating the User-Agent string between attempts
//! - Driving the retry state machine for rate limits and transient failures
//! - Error classification

use crate::config::{FetcherConfig, DEFAULT_USER_AGENTS};
use crate::crawler::retry::{
    classify_status, classify_transport, AttemptOutcome, RetryPolicy, RetryState, Transition,
};
use rand::seq::IndexedRandom;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// A successfully fetched document
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The requested URL
    pub url: String,

    /// HTTP status code
    pub status_code: u16,

    /// Response body
    pub body: Vec<u8>,
}

/// Errors returned by [`Fetcher::fetch`]
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected status code {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Max retries exceeded for {url} after {attempts} attempts (last: {last:?})")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last: Option<AttemptOutcome>,
    },
}

impl FetchError {
    /// Returns true if the fetcher gave up because of the retry ceiling
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::RetriesExhausted { .. })
    }
}

/// Result of a fetch operation
pub type FetchResult = Result<FetchedPage, FetchError>;

/// Fixed pool of client identities
#[derive(Debug, Clone)]
pub struct UserAgentPool {
    agents: Vec<String>,
}

impl UserAgentPool {
    pub fn new(agents: Vec<String>) -> Self {
        Self { agents }
    }

    /// Picks one identity at random
    pub fn pick(&self) -> &str {
        self.agents
            .choose(&mut rand::rng())
            .map(String::as_str)
            .unwrap_or(DEFAULT_USER_AGENTS[0])
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

/// One attempt, before the retry decision
enum Attempt {
    Fetched(FetchedPage),
    Failed {
        outcome: AttemptOutcome,
        error: FetchError,
    },
}

impl Attempt {
    fn transport(url: &str, source: reqwest::Error) -> Self {
        Self::Failed {
            outcome: classify_transport(&source),
            error: FetchError::Transport {
                url: url.to_string(),
                source,
            },
        }
    }

    fn outcome(&self) -> AttemptOutcome {
        match self {
            Self::Fetched(page) => AttemptOutcome::Success(page.status_code),
            Self::Failed { outcome, .. } => *outcome,
        }
    }

    fn into_result(self) -> FetchResult {
        match self {
            Self::Fetched(page) => Ok(page),
            Self::Failed { error, .. } => Err(error),
        }
    }
}

/// Builds an HTTP client with the configured timeouts
///
/// The User-Agent header is set per request, so the client carries none.
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches documents with retry and backoff
///
/// Cloning a fetcher is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    agents: UserAgentPool,
    policy: RetryPolicy,
}

impl Fetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            agents: UserAgentPool::new(config.user_agents.clone()),
            policy: RetryPolicy::from_config(config),
        })
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Fetches a URL, retrying rate limits and transient failures
    ///
    /// # Returns
    ///
    /// * `Ok(FetchedPage)` - The server answered 200
    /// * `Err(FetchError::Status)` - The server answered anything but 200 or 403
    /// * `Err(FetchError::Transport)` - A permanent transport failure
    /// * `Err(FetchError::RetriesExhausted)` - Every attempt was rate limited or failed transiently
    pub async fn fetch(&self, url: &str) -> FetchResult {
        let mut state = RetryState::new(self.policy);

        loop {
            let attempt = self.attempt(url).await;

            match state.on_outcome(attempt.outcome()) {
                Transition::Done | Transition::Abort => return attempt.into_result(),
                Transition::RetryAfter(delay) => {
                    match attempt.outcome() {
                        AttemptOutcome::RateLimited => tracing::warn!(
                            "Received 403 Forbidden (rate limit) for {}, pausing for {:?} before retrying",
                            url,
                            delay
                        ),
                        _ => tracing::warn!(
                            "Temporary error fetching {}, retrying in {:?}",
                            url,
                            delay
                        ),
                    }
                    tokio::time::sleep(delay).await;
                }
                Transition::Exhausted => {
                    return Err(FetchError::RetriesExhausted {
                        url: url.to_string(),
                        attempts: state.attempts(),
                        last: state.last_outcome(),
                    });
                }
            }
        }
    }

    async fn attempt(&self, url: &str) -> Attempt {
        let user_agent = self.agents.pick();

        let response = match self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Attempt::transport(url, e),
        };

        let status = response.status();
        match classify_status(status) {
            AttemptOutcome::Success(status_code) => match response.bytes().await {
                Ok(body) => Attempt::Fetched(FetchedPage {
                    url: url.to_string(),
                    status_code,
                    body: body.to_vec(),
                }),
                Err(e) => Attempt::transport(url, e),
            },
            outcome => Attempt::Failed {
                outcome,
                error: FetchError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                },
            },
        }
    }
}
