//! Error types for GeoIP2 web service lookups.

use reqwest::header::InvalidHeaderValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Boxed error returned by a [`Transport`](crate::Transport).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error returned by GeoIP2 web service operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GeoIp2Error {
    /// The transport failed to execute the request.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// The lookup context was cancelled before the exchange completed.
    #[error("lookup cancelled")]
    Cancelled,

    /// The lookup context deadline elapsed before the exchange completed.
    #[error("lookup deadline exceeded")]
    DeadlineExceeded,

    /// Reading the response body failed.
    #[error("error reading response body: {0}")]
    Body(#[source] reqwest::Error),

    /// The response body was not the expected JSON document.
    #[error("decoding error: {0}")]
    Json(
        #[from]
        #[source]
        serde_json::Error,
    ),

    /// The web service answered with a 4xx or 5xx status.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The configured base URL, or a URL built from it, is invalid.
    #[error("invalid url: {0}")]
    InvalidUrl(
        #[from]
        #[source]
        url::ParseError,
    ),

    /// A request header could not be built.
    #[error("invalid header: {0}")]
    InvalidHeader(
        #[from]
        #[source]
        InvalidHeaderValue,
    ),

    /// The default HTTP client could not be built.
    #[error("http client error: {0}")]
    Http(#[source] reqwest::Error),
}

impl GeoIp2Error {
    /// Returns true for failures of the request/response exchange itself,
    /// including cancellation and deadline expiry.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            GeoIp2Error::Transport(_)
                | GeoIp2Error::Cancelled
                | GeoIp2Error::DeadlineExceeded
                | GeoIp2Error::Body(_)
        )
    }

    /// Returns true if a response body could not be decoded.
    #[must_use]
    pub fn is_decoding(&self) -> bool {
        matches!(self, GeoIp2Error::Json(_))
    }

    /// The error reported by the web service, if any.
    #[must_use]
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            GeoIp2Error::Service(e) => Some(e),
            _ => None,
        }
    }
}

/// Error document returned by the web service with a 4xx or 5xx status.
///
/// See <https://dev.maxmind.com/geoip/docs/web-services/responses#errors>
/// for the list of codes.
#[derive(Error, Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[error("{code}: {error}")]
pub struct ServiceError {
    /// Machine readable code, e.g. `IP_ADDRESS_REQUIRED`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub code: String,
    /// Human readable description of the problem.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
}
