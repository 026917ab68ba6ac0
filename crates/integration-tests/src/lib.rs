//! Integration tests for the tenun storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tenun-integration-tests
//! ```
//!
//! Tests drive the full router in-process with `tower::ServiceExt::oneshot`;
//! the catalog is read from `fixtures/feed.xml`, so no network or server is
//! needed.
//!
//! # Test Categories
//!
//! - `storefront_catalog` - Listing, filters, detail, categories, health
//! - `storefront_cart` - Session-backed cart operations
//! - `feed_fixture` - Normalizer output for the fixture feed

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use tenun_storefront::config::{CatalogConfig, CatalogSource, StorefrontConfig};
use tenun_storefront::state::AppState;
use tower::ServiceExt;

/// Largest response body the helpers will read.
const BODY_LIMIT: usize = 1024 * 1024;

/// Path of the RSS fixture shared by all tests.
#[must_use]
pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/feed.xml")
}

/// Contents of the RSS fixture.
///
/// # Panics
///
/// Panics if the fixture cannot be read.
#[must_use]
#[allow(clippy::expect_used)]
pub fn fixture_xml() -> String {
    std::fs::read_to_string(fixture_path()).expect("Failed to read fixture feed")
}

/// Storefront configuration reading the catalog from `source`.
#[must_use]
pub fn test_config(source: CatalogSource) -> StorefrontConfig {
    StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        catalog: CatalogConfig {
            source,
            cache_ttl: Duration::from_secs(60),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Full storefront router over the fixture feed.
#[must_use]
pub fn test_app() -> Router {
    tenun_storefront::app(AppState::new(test_config(CatalogSource::File(
        fixture_path(),
    ))))
}

/// A response reduced to what the tests inspect.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    /// `name=value` part of the session cookie, if one was set.
    pub cookie: Option<String>,
    pub request_id: Option<String>,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Body parsed as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Response body is not JSON")
    }

    /// Body as UTF-8 text.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Send a GET request, with the session cookie when given.
pub async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> TestResponse {
    let mut request = Request::get(uri);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    send(app, request.body(Body::empty())).await
}

/// Send a form POST request, with the session cookie when given.
pub async fn post_form(
    app: &Router,
    uri: &str,
    form: &str,
    cookie: Option<&str>,
) -> TestResponse {
    let mut request = Request::post(uri).header(
        header::CONTENT_TYPE,
        "application/x-www-form-urlencoded",
    );
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    send(app, request.body(Body::from(form.to_string()))).await
}

#[allow(clippy::expect_used)]
async fn send(
    app: &Router,
    request: Result<Request<Body>, axum::http::Error>,
) -> TestResponse {
    let request = request.expect("Failed to build request");
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Router is infallible");

    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);
    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = axum::body::to_bytes(response.into_body(), BODY_LIMIT)
        .await
        .expect("Failed to read response body")
        .to_vec();

    TestResponse {
        status,
        cookie,
        request_id,
        body,
    }
}
