//! Per-lookup cancellation and deadlines.

use std::future::{pending, Future};
use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

use crate::error::GeoIp2Error;

/// Bounds a single lookup in time and lets the caller abandon it.
///
/// [`Context::background`] (also the `Default`) never expires. Passing
/// `None` as the context of a lookup is the same as passing it.
#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    cancellation: Option<CancellationToken>,
}

impl Context {
    /// A context without a deadline or cancellation token.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now.
    ///
    /// A timeout too large to represent as an instant gives a context
    /// without a deadline. Lookups with a deadline must run on a tokio
    /// runtime with the time driver enabled (`Builder::enable_time`).
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => Self::with_deadline(deadline),
            None => Self::background(),
        }
    }

    /// A context that expires at `deadline`.
    ///
    /// Lookups with a deadline must run on a tokio runtime with the time
    /// driver enabled (`Builder::enable_time`).
    #[must_use]
    pub fn with_deadline(deadline: Instant) -> Self {
        Context {
            deadline: Some(deadline),
            cancellation: None,
        }
    }

    /// A context that ends when `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self::background().cancellation(token)
    }

    /// Adds a cancellation token to this context.
    #[must_use]
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Instant after which lookups fail with
    /// [`GeoIp2Error::DeadlineExceeded`], if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Token whose cancellation fails lookups with
    /// [`GeoIp2Error::Cancelled`], if any.
    pub fn cancellation_token(&self) -> Option<&CancellationToken> {
        self.cancellation.as_ref()
    }

    /// Returns true once the context has been cancelled or its deadline
    /// has passed.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
            || self.deadline.is_some_and(|d| d <= Instant::now())
    }

    /// Drives `fut` to completion unless the context ends first.
    pub(crate) async fn run<F: Future>(&self, fut: F) -> Result<F::Output, GeoIp2Error> {
        let cancelled = async {
            match &self.cancellation {
                Some(token) => token.cancelled().await,
                None => pending().await,
            }
        };
        let expired = async {
            match self.deadline {
                Some(deadline) => sleep_until(deadline).await,
                None => pending().await,
            }
        };

        tokio::select! {
            biased;
            () = cancelled => Err(GeoIp2Error::Cancelled),
            () = expired => Err(GeoIp2Error::DeadlineExceeded),
            out = fut => Ok(out),
        }
    }
}
