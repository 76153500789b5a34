use anyhow::{Context, Result};
use reqwest::{Client, ClientBuilder, header};
use std::time::Duration;

/// Common HTTP headers used for all requests
const USER_AGENT: &str = concat!("sitehealth/", env!("CARGO_PKG_VERSION"));
const ACCEPT: &str = "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

fn default_headers() -> header::HeaderMap {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header::HeaderValue::from_static(ACCEPT_LANGUAGE),
    );
    headers
}

/// Creates the client used by the crawler to fetch pages
pub fn build_http_client(timeout_secs: u64) -> Result<Client> {
    ClientBuilder::new()
        .user_agent(USER_AGENT)
        .default_headers(default_headers())
        .timeout(Duration::from_secs(timeout_secs))
        .redirect(reqwest::redirect::Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
        .context("Failed to build HTTP client")
}

/// Creates a client for the TLS probe: no redirects, so the handshake is
/// only ever made with the probed host, and the peer certificate is kept.
///
/// `timeout_secs` bounds the connect phase (TCP and TLS). The whole request
/// gets twice that, so a stalled handshake always surfaces as a connect
/// error first.
pub fn build_tls_probe_client(timeout_secs: u64) -> Result<Client> {
    ClientBuilder::new()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs.saturating_mul(2)))
        .connect_timeout(Duration::from_secs(timeout_secs))
        .redirect(reqwest::redirect::Policy::none())
        .tls_info(true)
        .build()
        .context("Failed to build TLS probe client")
}
