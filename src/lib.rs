#![deny(trivial_casts, trivial_numeric_casts, unused_import_braces)]
//! # GeoIP2 Web Services Client
//!
//! This library queries the MaxMind GeoIP2 Precision web services
//! (Country, City and Insights) and decodes their answers into
//! strongly-typed records.
//!
//! ## Features
//!
//! - **`rustls-tls`** (default): TLS through rustls for the default HTTP client
//! - **`native-tls`**: TLS through the platform library instead
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use geoip2_web::{Client, Context};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("42", "license-key");
//!
//!     let ctx = Context::with_timeout(Duration::from_secs(3));
//!     let response = client.insights(Some(&ctx), "81.2.69.160").await?;
//!
//!     println!(
//!         "Country: {}",
//!         response.country.iso_code.as_deref().unwrap_or("Unknown")
//!     );
//!     if let Some(isp) = &response.traits.isp {
//!         println!("ISP: {isp}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//!
//! A lookup fails in one of three ways, all reported through
//! [`GeoIp2Error`]:
//!
//! - the transport failed, was cancelled or ran past its deadline
//!   ([`GeoIp2Error::is_transport`]);
//! - the body was not the expected JSON ([`GeoIp2Error::is_decoding`]);
//! - the service answered with an error document
//!   ([`GeoIp2Error::service_error`]).
//!
//! ```rust,no_run
//! # async fn run(client: geoip2_web::Client) {
//! match client.city(None, "not-an-ip").await {
//!     Ok(response) => println!("{:?}", response.city.names.english()),
//!     Err(e) => match e.service_error() {
//!         Some(service) if service.code == "IP_ADDRESS_INVALID" => {}
//!         _ => eprintln!("lookup failed: {e}"),
//!     },
//! }
//! # }
//! ```

mod client;
mod context;
mod error;
pub mod geoip2;
mod transport;

pub use client::{Client, ClientBuilder, Endpoint, DEFAULT_BASE_URL};
pub use context::Context;
pub use error::{BoxError, GeoIp2Error, ServiceError};
pub use geoip2::Response;
pub use transport::{Transport, TransportFn};

pub use tokio_util::sync::CancellationToken;

#[cfg(test)]
mod client_test;
