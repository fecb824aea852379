//! Retry state machine for page fetches
//!
//! Each fetch attempt is reduced to an [`AttemptOutcome`], and
//! [`RetryState::on_outcome`] maps it to the next [`Transition`]:
//!
//! | Outcome | Transition |
//! |---------|------------|
//! | HTTP 200 | Done |
//! | HTTP 403 (rate limited) | Retry after backoff, or Exhausted on the last attempt |
//! | Temporary transport error | Retry after backoff, or Exhausted on the last attempt |
//! | Permanent transport error | Abort |
//! | Any other status | Abort |
//!
//! The backoff is a fixed duration.

use crate::config::FetcherConfig;
use reqwest::StatusCode;
use std::time::Duration;

/// Retry ceiling and backoff for one fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Sleep between a retryable failure and the next attempt
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    pub fn from_config(config: &FetcherConfig) -> Self {
        Self::new(config.max_attempts, Duration::from_millis(config.backoff_ms))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&FetcherConfig::default())
    }
}

/// Classified result of a single fetch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The server answered 200
    Success(u16),
    /// The server answered 403, treated as a rate-limit signal
    RateLimited,
    /// Transient network failure (timeout, refused or reset connection)
    TemporaryError,
    /// Failure that will not go away on retry (bad request, redirect loop)
    PermanentError,
    /// Any status other than 200 or 403
    UnexpectedStatus(u16),
}

impl AttemptOutcome {
    /// Returns true if another attempt may change the result
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::TemporaryError)
    }
}

/// What the fetcher does after an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Return the fetched page
    Done,
    /// Sleep for the given duration, then try again
    RetryAfter(Duration),
    /// Give up immediately with this attempt's error
    Abort,
    /// Give up because every allowed attempt was used
    Exhausted,
}

/// Attempt counter plus the last classified outcome
#[derive(Debug, Clone)]
pub struct RetryState {
    policy: RetryPolicy,
    attempts: u32,
    last: Option<AttemptOutcome>,
}

impl RetryState {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            attempts: 0,
            last: None,
        }
    }

    /// Number of attempts recorded so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Outcome of the most recent attempt
    pub fn last_outcome(&self) -> Option<AttemptOutcome> {
        self.last
    }

    /// Records an attempt and returns the next transition
    pub fn on_outcome(&mut self, outcome: AttemptOutcome) -> Transition {
        self.attempts += 1;
        self.last = Some(outcome);

        match outcome {
            AttemptOutcome::Success(_) => Transition::Done,
            AttemptOutcome::PermanentError | AttemptOutcome::UnexpectedStatus(_) => {
                Transition::Abort
            }
            AttemptOutcome::RateLimited | AttemptOutcome::TemporaryError => {
                if self.attempts >= self.policy.max_attempts {
                    Transition::Exhausted
                } else {
                    Transition::RetryAfter(self.policy.backoff)
                }
            }
        }
    }
}

/// Classifies an HTTP status code
pub fn classify_status(status: StatusCode) -> AttemptOutcome {
    match status {
        StatusCode::OK => AttemptOutcome::Success(status.as_u16()),
        StatusCode::FORBIDDEN => AttemptOutcome::RateLimited,
        other => AttemptOutcome::UnexpectedStatus(other.as_u16()),
    }
}

/// Classifies a transport-level error as temporary or permanent
pub fn classify_transport(error: &reqwest::Error) -> AttemptOutcome {
    if error.is_builder() || error.is_redirect() || error.is_decode() {
        AttemptOutcome::PermanentError
    } else if error.is_timeout() || error.is_connect() || error.is_request() || error.is_body() {
        AttemptOutcome::TemporaryError
    } else {
        AttemptOutcome::PermanentError
    }
}
