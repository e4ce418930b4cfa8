//! Request execution.
//!
//! The [`Client`](crate::Client) builds requests and interprets
//! responses; a [`Transport`] only moves them over the wire. Swapping the
//! transport lets tests answer requests without any network I/O.

use std::fmt;
use std::future::Future;

use async_trait::async_trait;
use reqwest::{Request, Response};

use crate::context::Context;
use crate::error::BoxError;

/// Executes a single HTTP request.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the response head with an unread body.
    ///
    /// The client already races this call against `ctx`; implementations
    /// only need to look at it if they hold resources of their own.
    async fn execute(&self, ctx: Context, request: Request) -> Result<Response, BoxError>;
}

#[async_trait]
impl Transport for reqwest::Client {
    async fn execute(&self, _ctx: Context, request: Request) -> Result<Response, BoxError> {
        Ok(reqwest::Client::execute(self, request).await?)
    }
}

/// Adapts a closure into a [`Transport`].
///
/// ```rust
/// use geoip2_web::{BoxError, Client, TransportFn};
///
/// let transport = TransportFn::new(|_ctx, _request| async {
///     let response = http::Response::builder()
///         .status(200)
///         .body(r#"{"country": {"iso_code": "SE"}}"#)
///         .unwrap();
///     Ok::<_, BoxError>(reqwest::Response::from(response))
/// });
/// let _client = Client::with_transport("42", "license-key", transport);
/// ```
#[derive(Clone)]
pub struct TransportFn<F>(F);

impl<F, Fut> TransportFn<F>
where
    F: Fn(Context, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, BoxError>> + Send + 'static,
{
    /// Wraps `f`, called once per request with the lookup context.
    pub fn new(f: F) -> Self {
        TransportFn(f)
    }
}

impl<F> fmt::Debug for TransportFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportFn").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F, Fut> Transport for TransportFn<F>
where
    F: Fn(Context, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, BoxError>> + Send + 'static,
{
    async fn execute(&self, ctx: Context, request: Request) -> Result<Response, BoxError> {
        (self.0)(ctx, request).await
    }
}
