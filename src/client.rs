//! The web service client.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, trace};
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Method, Request, StatusCode};
use url::Url;

use crate::context::Context;
use crate::error::{GeoIp2Error, ServiceError};
use crate::geoip2::Response;
use crate::transport::{Transport, TransportFn};
use crate::BoxError;

/// Root of the MaxMind web services.
pub const DEFAULT_BASE_URL: &str = "https://geoip.maxmind.com/";

const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// The three GeoIP2 web service endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Country,
    City,
    Insights,
}

impl Endpoint {
    /// Path of the endpoint relative to the service root, with a trailing
    /// slash so the IP address can be appended.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Country => "geoip/v2.1/country/",
            Endpoint::City => "geoip/v2.1/city/",
            Endpoint::Insights => "geoip/v2.1/insights/",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Endpoint::Country => "country",
            Endpoint::City => "city",
            Endpoint::Insights => "insights",
        })
    }
}

/// Client for the GeoIP2 Country, City and Insights web services.
///
/// The client holds only the account credentials and a shared transport,
/// so it is cheap to clone and safe to use from many tasks at once.
///
/// ```rust,no_run
/// use std::time::Duration;
/// use geoip2_web::{Client, Context};
///
/// # async fn run() -> Result<(), geoip2_web::GeoIp2Error> {
/// let client = Client::new("42", "license-key");
///
/// let ctx = Context::with_timeout(Duration::from_secs(3));
/// let response = client.city(Some(&ctx), "128.101.101.101").await?;
/// println!("{:?}", response.city.names.english());
///
/// // No context: the lookup runs until the transport gives up.
/// let response = client.country(None, "128.101.101.101").await?;
/// println!("{:?}", response.country.iso_code);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    user_id: String,
    license_key: String,
    base_url: String,
    user_agent: HeaderValue,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Client using a default `reqwest` HTTP client.
    pub fn new(user_id: impl Into<String>, license_key: impl Into<String>) -> Self {
        Self::with_http_client(user_id, license_key, reqwest::Client::new())
    }

    /// Client sending its requests through an existing `reqwest` client.
    pub fn with_http_client(
        user_id: impl Into<String>,
        license_key: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self::with_transport(user_id, license_key, client)
    }

    /// Client sending its requests through `transport`.
    pub fn with_transport(
        user_id: impl Into<String>,
        license_key: impl Into<String>,
        transport: impl Transport + 'static,
    ) -> Self {
        Client {
            user_id: user_id.into(),
            license_key: license_key.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            user_agent: HeaderValue::from_static(DEFAULT_USER_AGENT),
            transport: Arc::new(transport),
        }
    }

    /// Client sending its requests through the closure `f`.
    pub fn with_transport_fn<F, Fut>(
        user_id: impl Into<String>,
        license_key: impl Into<String>,
        f: F,
    ) -> Self
    where
        F: Fn(Context, Request) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<reqwest::Response, BoxError>> + Send + 'static,
    {
        Self::with_transport(user_id, license_key, TransportFn::new(f))
    }

    /// Starts configuring a client.
    pub fn builder(user_id: impl Into<String>, license_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(user_id.into(), license_key.into())
    }

    /// Looks up `ip_address` with the Country web service.
    pub async fn country(
        &self,
        ctx: Option<&Context>,
        ip_address: &str,
    ) -> Result<Response, GeoIp2Error> {
        self.lookup(ctx, Endpoint::Country, ip_address).await
    }

    /// Looks up `ip_address` with the City web service.
    pub async fn city(
        &self,
        ctx: Option<&Context>,
        ip_address: &str,
    ) -> Result<Response, GeoIp2Error> {
        self.lookup(ctx, Endpoint::City, ip_address).await
    }

    /// Looks up `ip_address` with the Insights web service.
    pub async fn insights(
        &self,
        ctx: Option<&Context>,
        ip_address: &str,
    ) -> Result<Response, GeoIp2Error> {
        self.lookup(ctx, Endpoint::Insights, ip_address).await
    }

    /// Looks up `ip_address` with the given endpoint.
    ///
    /// The address is not validated here; the service reports malformed
    /// addresses as a [`ServiceError`]. A 4xx or 5xx answer is decoded as a
    /// [`ServiceError`] and returned as [`GeoIp2Error::Service`], any other
    /// status as a [`Response`].
    pub async fn lookup(
        &self,
        ctx: Option<&Context>,
        endpoint: Endpoint,
        ip_address: &str,
    ) -> Result<Response, GeoIp2Error> {
        let background = Context::background();
        let ctx = ctx.unwrap_or(&background);

        let request = self.request(endpoint, ip_address)?;
        debug!("{endpoint} lookup for {ip_address}");

        let (status, body) = ctx
            .run(async {
                let response = self
                    .transport
                    .execute(ctx.clone(), request)
                    .await
                    .map_err(GeoIp2Error::Transport)?;
                let status = response.status();
                let body = response.bytes().await.map_err(GeoIp2Error::Body)?;
                Ok::<_, GeoIp2Error>((status, body))
            })
            .await??;
        trace!("{endpoint} lookup for {ip_address} returned {status}");

        decode_body(status, &body)
    }

    fn request(&self, endpoint: Endpoint, ip_address: &str) -> Result<Request, GeoIp2Error> {
        let url = self.endpoint_url(endpoint, ip_address)?;

        let mut request = Request::new(Method::GET, url);
        let headers = request.headers_mut();
        headers.insert(AUTHORIZATION, self.authorization()?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, self.user_agent.clone());
        Ok(request)
    }

    /// Endpoint prefix plus the address as exactly one path segment, so
    /// `/` or dot segments in the address cannot leave the endpoint.
    fn endpoint_url(&self, endpoint: Endpoint, ip_address: &str) -> Result<Url, GeoIp2Error> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, endpoint.path()))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| GeoIp2Error::InvalidUrl(url::ParseError::RelativeUrlWithoutBase))?;
            segments.pop_if_empty();
            // a URL cannot carry a literal `.` or `..` segment
            if matches!(ip_address, "." | "..") {
                segments.push("");
            } else {
                segments.push(ip_address);
            }
        }
        Ok(url)
    }

    fn authorization(&self) -> Result<HeaderValue, GeoIp2Error> {
        let credentials = STANDARD.encode(format!("{}:{}", self.user_id, self.license_key));
        let mut value = HeaderValue::from_str(&format!("Basic {credentials}"))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("user_id", &self.user_id)
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

fn decode_body(status: StatusCode, body: &[u8]) -> Result<Response, GeoIp2Error> {
    if (400..600).contains(&status.as_u16()) {
        let error: ServiceError = serde_json::from_slice(body)?;
        debug!("service answered {status}: {error}");
        return Err(error.into());
    }

    Ok(serde_json::from_slice(body)?)
}

/// Configures a [`Client`].
///
/// ```rust
/// use std::time::Duration;
/// use geoip2_web::Client;
///
/// let client = Client::builder("42", "license-key")
///     .base_url("https://geolite.info")
///     .timeout(Duration::from_secs(5))
///     .build()
///     .unwrap();
/// ```
pub struct ClientBuilder {
    user_id: String,
    license_key: String,
    base_url: String,
    user_agent: String,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    fn new(user_id: String, license_key: String) -> Self {
        ClientBuilder {
            user_id,
            license_key,
            base_url: DEFAULT_BASE_URL.to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout: None,
            connect_timeout: None,
            transport: None,
        }
    }

    /// Root URL of the service. A trailing slash is added if missing.
    #[must_use]
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_owned();
        self
    }

    /// `User-Agent` header sent with every lookup.
    #[must_use]
    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_owned();
        self
    }

    /// Total timeout for each request of the default HTTP client.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Connect timeout of the default HTTP client.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Uses `client` instead of building one. The builder timeouts do not
    /// apply to it.
    #[must_use]
    pub fn http_client(self, client: reqwest::Client) -> Self {
        self.transport(client)
    }

    /// Uses `transport` instead of an HTTP client. The builder timeouts do
    /// not apply to it.
    #[must_use]
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Validates the configuration and builds the client.
    pub fn build(self) -> Result<Client, GeoIp2Error> {
        let mut base_url = self.base_url;
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Url::parse(&base_url)?;

        let user_agent = HeaderValue::from_str(&self.user_agent)?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                Arc::new(builder.build().map_err(GeoIp2Error::Http)?)
            }
        };

        Ok(Client {
            user_id: self.user_id,
            license_key: self.license_key,
            base_url,
            user_agent,
            transport,
        })
    }
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("user_id", &self.user_id)
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish_non_exhaustive()
    }
}
