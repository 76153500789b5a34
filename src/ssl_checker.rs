use anyhow::{Context, Result, anyhow};
use chrono::DateTime;
use reqwest::tls::TlsInfo;
use url::Url;

use crate::http_client::build_tls_probe_client;
use crate::models::SslAnalysis;

/// Probes `host:443` with a TLS handshake.
///
/// The handshake is driven by an HTTP HEAD request. Connect-phase failures
/// (DNS, refused connection, TLS handshake, connect timeout) score 0. An
/// error after the connection is up, such as a reset or a stalled reply to
/// the HEAD, still counts as a completed handshake, though the certificate
/// expiry is then unknown. Failures are logged and never returned.
pub struct SslChecker {
    timeout_secs: u64,
    port: u16,
}

impl SslChecker {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            timeout_secs,
            port: 443,
        }
    }

    /// Probes a port other than 443.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub async fn check(&self, domain: &str) -> SslAnalysis {
        match self.handshake(domain).await {
            Ok(expires) => {
                tracing::info!(domain = %domain, expires = ?expires, "TLS handshake succeeded");
                SslAnalysis::secure(expires)
            }
            Err(e) => {
                let message = format!("{:#}", e);
                tracing::warn!(domain = %domain, error = %message, "TLS handshake failed");
                SslAnalysis::failed(message)
            }
        }
    }

    async fn handshake(&self, domain: &str) -> Result<Option<String>> {
        let host = probe_host(domain)?;
        let client = build_tls_probe_client(self.timeout_secs)?;

        // Any HTTP status means the handshake completed.
        let response = match client
            .head(format!("https://{}:{}/", host, self.port))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if handshake_completed(&e) => {
                tracing::warn!(host = %host, error = %e, "HEAD failed after the TLS handshake");
                return Ok(None);
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!(
                        "Could not establish a TLS connection to {}:{}",
                        host, self.port
                    )
                });
            }
        };

        let expires = response
            .extensions()
            .get::<TlsInfo>()
            .and_then(TlsInfo::peer_certificate)
            .and_then(certificate_expiry);

        Ok(expires)
    }
}

/// TLS runs inside reqwest's connector, so every handshake failure is a
/// connect error. Anything else happened on an established connection.
fn handshake_completed(error: &reqwest::Error) -> bool {
    !error.is_connect() && !error.is_builder()
}

/// Extracts the bare host from a domain that may carry a scheme, port or path.
pub fn probe_host(domain: &str) -> Result<String> {
    let trimmed = domain.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("No domain to probe"));
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&with_scheme).with_context(|| format!("Invalid domain: {}", domain))?;
    url.host_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Domain has no host: {}", domain))
}

fn certificate_expiry(der: &[u8]) -> Option<String> {
    let (_, certificate) = x509_parser::parse_x509_certificate(der).ok()?;
    let timestamp = certificate.validity().not_after.timestamp();
    DateTime::from_timestamp(timestamp, 0).map(|expires| expires.to_rfc3339())
}
