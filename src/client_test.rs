use std::future::pending;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use tokio_util::sync::CancellationToken;

use crate::{BoxError, Client, Context, Endpoint, GeoIp2Error};

const SAMPLE: &str = include_str!("../test-data/insights.json");

const IP_ADDRESS_REQUIRED: &str = r#"
{
    "code": "IP_ADDRESS_REQUIRED",
    "error": "You have not supplied an IP address, which is a required field."
}"#;

fn response(status: u16, body: &'static str) -> reqwest::Response {
    let response = http::Response::builder()
        .status(status)
        .body(body)
        .unwrap();
    reqwest::Response::from(response)
}

fn client_answering(status: u16, body: &'static str) -> Client {
    Client::with_transport_fn("blah-user-id", "blah-license-key", move |_ctx, _request| async move {
        Ok::<_, BoxError>(response(status, body))
    })
}

#[tokio::test]
async fn test_all_endpoints_decode_sample() {
    let _ = env_logger::try_init();

    let client = client_answering(200, SAMPLE);

    let resp = client.country(None, "1.2.3.4").await.unwrap();
    assert_eq!(resp.city.confidence, Some(25));

    let resp = client.city(None, "1.2.3.4").await.unwrap();
    assert_eq!(resp.city.confidence, Some(25));

    let resp = client.insights(None, "1.2.3.4").await.unwrap();
    assert_eq!(resp.city.confidence, Some(25));
}

#[allow(clippy::float_cmp)]
#[tokio::test]
async fn test_insights_traits() {
    let _ = env_logger::try_init();

    let client = client_answering(200, SAMPLE);
    let resp = client.insights(None, "1.2.3.4").await.unwrap();
    let traits = &resp.traits;

    assert_eq!(traits.ip_address.as_deref(), Some("1.2.3.4"));
    assert_eq!(traits.network.as_deref(), Some("1.2.3.0/24"));
    assert_eq!(traits.autonomous_system_number, Some(1239));
    assert_eq!(
        traits.autonomous_system_organization.as_deref(),
        Some("Linkem IR WiMax Network")
    );
    assert_eq!(traits.domain.as_deref(), Some("example.com"));
    assert_eq!(traits.isp.as_deref(), Some("Linkem spa"));
    assert_eq!(
        traits.organization.as_deref(),
        Some("Linkem IR WiMax Network")
    );
    assert_eq!(traits.is_anonymous, Some(true));
    assert_eq!(traits.is_anonymous_proxy, Some(true));
    assert_eq!(traits.is_anonymous_vpn, Some(true));
    assert_eq!(traits.is_hosting_provider, Some(true));
    assert_eq!(traits.is_public_proxy, Some(true));
    assert_eq!(traits.is_residential_proxy, Some(true));
    assert_eq!(traits.is_satellite_provider, Some(true));
    assert_eq!(traits.is_tor_exit_node, Some(true));
    assert_eq!(traits.static_ip_score, Some(1.5));
    assert_eq!(traits.user_count, Some(1));
    assert_eq!(traits.user_type.as_deref(), Some("traveler"));

    // not in the sample
    assert_eq!(traits.is_anycast, None);
    assert_eq!(traits.connection_type, None);
}

#[tokio::test]
async fn test_service_error() {
    let _ = env_logger::try_init();

    let client = client_answering(400, IP_ADDRESS_REQUIRED);
    let err = client.city(None, "1.2.3.4").await.unwrap_err();

    let service = err.service_error().expect("expected a service error");
    assert_eq!(service.code, "IP_ADDRESS_REQUIRED");
    assert_eq!(
        service.error,
        "You have not supplied an IP address, which is a required field."
    );
    assert_eq!(
        err.to_string(),
        "IP_ADDRESS_REQUIRED: You have not supplied an IP address, which is a required field."
    );
    assert!(!err.is_transport());
    assert!(!err.is_decoding());
}

#[tokio::test]
async fn test_server_error_status() {
    let client = client_answering(
        503,
        r#"{"code":"SERVICE_UNAVAILABLE","error":"try again later"}"#,
    );
    let err = client.insights(None, "1.2.3.4").await.unwrap_err();
    assert_eq!(err.service_error().unwrap().code, "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn test_malformed_error_body_is_decoding_error() {
    let client = client_answering(500, "<html>Internal Server Error</html>");
    let err = client.country(None, "1.2.3.4").await.unwrap_err();

    assert!(err.is_decoding(), "unexpected error: {err}");
    assert!(err.service_error().is_none());
}

#[tokio::test]
async fn test_malformed_success_body_is_decoding_error() {
    let client = client_answering(200, r#"{"city": {"confidence": "high"}}"#);
    let err = client.city(None, "1.2.3.4").await.unwrap_err();
    assert!(err.is_decoding(), "unexpected error: {err}");

    let client = client_answering(200, "");
    let err = client.city(None, "1.2.3.4").await.unwrap_err();
    assert!(err.is_decoding(), "unexpected error: {err}");
}

#[tokio::test]
async fn test_transport_error_propagates() {
    let client = Client::with_transport_fn("42", "abc123", |_ctx, _request| async {
        Err::<reqwest::Response, BoxError>("connection reset by peer".into())
    });
    let err = client.insights(None, "1.2.3.4").await.unwrap_err();

    assert!(err.is_transport());
    assert_eq!(err.to_string(), "transport error: connection reset by peer");
}

#[tokio::test]
async fn test_requests_carry_url_and_credentials() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);
    let client = Client::with_transport_fn("42", "abc123", move |_ctx, request| {
        let auth = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        recorder
            .lock()
            .unwrap()
            .push((request.method().clone(), request.url().to_string(), auth));
        async { Ok::<_, BoxError>(response(200, "{}")) }
    });

    for endpoint in [Endpoint::Country, Endpoint::City, Endpoint::Insights] {
        client.lookup(None, endpoint, "81.2.69.160").await.unwrap();
    }

    let seen = seen.lock().unwrap();
    let urls: Vec<&str> = seen.iter().map(|(_, url, _)| url.as_str()).collect();
    assert_eq!(
        urls,
        [
            "https://geoip.maxmind.com/geoip/v2.1/country/81.2.69.160",
            "https://geoip.maxmind.com/geoip/v2.1/city/81.2.69.160",
            "https://geoip.maxmind.com/geoip/v2.1/insights/81.2.69.160",
        ]
    );
    for (method, _, auth) in seen.iter() {
        assert_eq!(*method, reqwest::Method::GET);
        // base64("42:abc123")
        assert_eq!(auth.as_deref(), Some("Basic NDI6YWJjMTIz"));
    }
}

#[tokio::test]
async fn test_no_context_is_background() {
    let client = Client::with_transport_fn("42", "abc123", |ctx, _request| async move {
        assert!(ctx.deadline().is_none());
        assert!(ctx.cancellation_token().is_none());
        Ok::<_, BoxError>(response(200, SAMPLE))
    });

    let resp = client.city(None, "1.2.3.4").await.unwrap();
    assert_eq!(resp.country.iso_code.as_deref(), Some("US"));

    let resp = client.city(Some(&Context::background()), "1.2.3.4").await.unwrap();
    assert_eq!(resp.country.iso_code.as_deref(), Some("US"));
}

#[tokio::test]
async fn test_context_reaches_transport() {
    let client = Client::with_transport_fn("42", "abc123", |ctx, _request| async move {
        assert!(ctx.deadline().is_some());
        Ok::<_, BoxError>(response(200, SAMPLE))
    });

    let ctx = Context::with_timeout(Duration::from_secs(30));
    client.country(Some(&ctx), "1.2.3.4").await.unwrap();
}

#[tokio::test]
async fn test_deadline_exceeded() {
    let client = Client::with_transport_fn("42", "abc123", |_ctx, _request| async {
        pending::<Result<reqwest::Response, BoxError>>().await
    });

    let ctx = Context::with_timeout(Duration::from_millis(20));
    let err = client.insights(Some(&ctx), "1.2.3.4").await.unwrap_err();

    assert!(matches!(err, GeoIp2Error::DeadlineExceeded));
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_cancelled_before_send() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let client = Client::with_transport_fn("42", "abc123", move |_ctx, _request| {
        counter.fetch_add(1, Ordering::SeqCst);
        async { Ok::<_, BoxError>(response(200, SAMPLE)) }
    });

    let token = CancellationToken::new();
    token.cancel();
    let ctx = Context::with_cancellation(token);
    let err = client.city(Some(&ctx), "1.2.3.4").await.unwrap_err();

    assert!(matches!(err, GeoIp2Error::Cancelled));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_cancelled_in_flight() {
    let client = Client::with_transport_fn("42", "abc123", |_ctx, _request| async {
        pending::<Result<reqwest::Response, BoxError>>().await
    });

    let token = CancellationToken::new();
    let ctx = Context::with_timeout(Duration::from_secs(30)).cancellation(token.clone());
    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        token.cancel();
    });

    let err = client.country(Some(&ctx), "1.2.3.4").await.unwrap_err();
    assert!(matches!(err, GeoIp2Error::Cancelled));
    canceller.await.unwrap();
}

#[tokio::test]
async fn test_shared_client_concurrent_lookups() {
    let client = client_answering(200, SAMPLE);
    let other = client.clone();

    let (a, b, c) = tokio::join!(
        client.country(None, "1.2.3.4"),
        other.city(None, "1.2.3.4"),
        client.insights(None, "1.2.3.4"),
    );

    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(c.unwrap().maxmind.queries_remaining, Some(54321));
}

#[tokio::test]
async fn test_builder_transport_and_base_url() {
    let seen = Arc::new(Mutex::new(None));
    let recorder = Arc::clone(&seen);
    let client = Client::builder("42", "abc123")
        .base_url("http://127.0.0.1:9000")
        .transport(crate::TransportFn::new(move |_ctx, request: reqwest::Request| {
            *recorder.lock().unwrap() = Some(request.url().to_string());
            async { Ok::<_, BoxError>(response(200, "{}")) }
        }))
        .build()
        .unwrap();

    let resp = client.country(None, "10.0.0.1").await.unwrap();
    assert!(resp.country.is_empty());
    assert_eq!(
        seen.lock().unwrap().as_deref(),
        Some("http://127.0.0.1:9000/geoip/v2.1/country/10.0.0.1")
    );
}
