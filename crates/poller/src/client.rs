//! Market status HTTP client.
//!
//! Async client using `reqwest` with an explicit request timeout.

use std::future::Future;
use std::pin::Pin;

use cse_status_protocol::{MarketStatusRequest, Outcome};
use reqwest::Url;
use tracing::{debug, warn};

use crate::classify::{classify_response, network_reason};
use crate::config::PollerConfig;
use crate::error::PollerError;

/// Boxed future returned by [`StatusSource::check`].
pub type SourceFuture<'a> = Pin<Box<dyn Future<Output = Outcome> + Send + 'a>>;

/// Anything that can produce one classified outcome per call.
///
/// Implementations must never fail: every error is folded into the
/// returned [`Outcome`].
pub trait StatusSource: Send + Sync + 'static {
    fn check(&self) -> SourceFuture<'_>;
}

/// Client for the exchange status endpoint.
pub struct StatusClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl StatusClient {
    /// Creates a client for the configured endpoint and timeout.
    pub fn new(config: &PollerConfig) -> Result<Self, PollerError> {
        let endpoint =
            Url::parse(&config.endpoint_url).map_err(|e| PollerError::InvalidEndpoint {
                url: config.endpoint_url.clone(),
                reason: e.to_string(),
            })?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("cse-status/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, endpoint })
    }

    /// Returns the endpoint this client posts to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Performs one request and classifies the result.
    pub async fn check_status(&self) -> Outcome {
        let resp = match self
            .http
            .post(self.endpoint.clone())
            .json(&MarketStatusRequest::default())
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                let reason = network_reason(&e);
                warn!(error = %e, ?reason, "market status request failed");
                return Outcome::NetworkError(reason);
            }
        };

        let status = resp.status().as_u16();
        let body = match resp.bytes().await {
            Ok(body) => body,
            Err(e) => {
                let reason = network_reason(&e);
                warn!(status, error = %e, ?reason, "failed to read market status body");
                return Outcome::NetworkError(reason);
            }
        };

        let outcome = classify_response(status, &body);
        if outcome.is_error() {
            warn!(status, len = body.len(), ?outcome, "unusable market status response");
        } else {
            debug!(status, ?outcome, "market status response");
        }
        outcome
    }
}

impl StatusSource for StatusClient {
    fn check(&self) -> SourceFuture<'_> {
        Box::pin(self.check_status())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use cse_status_protocol::{NetworkReason, ParseFailure};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Starts a mock HTTP server that answers once with the given status and body.
    ///
    /// The handle resolves to the raw request text the server received.
    async fn mock_server(status: u16, body: &str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}/api/marketStatus");
        let body = body.to_string();

        let handle = tokio::spawn(async move {
            let mut request = String::new();
            if let Ok((mut stream, _)) = listener.accept().await {
                request = read_request(&mut stream).await;

                let resp = format!(
                    "HTTP/1.1 {status} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(resp.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
            request
        });

        (url, handle)
    }

    /// Reads one request: headers plus `Content-Length` bytes of body.
    async fn read_request(stream: &mut TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = match stream.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => n,
            };
            data.extend_from_slice(&buf[..n]);

            let text = String::from_utf8_lossy(&data);
            if let Some(end) = text.find("\r\n\r\n") {
                let body_len = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if data.len() >= end + 4 + body_len {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).into_owned()
    }

    /// Starts a server that accepts connections and never answers.
    async fn silent_server() -> (String, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}/api/marketStatus");

        let handle = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });

        (url, handle)
    }

    fn client_for(url: &str, timeout: Duration) -> StatusClient {
        let config = PollerConfig {
            request_timeout: timeout,
            ..PollerConfig::with_endpoint(url)
        };
        StatusClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn open_response_classified() {
        let (url, handle) = mock_server(200, r#"{"status":"Market is Open"}"#).await;

        let client = client_for(&url, Duration::from_secs(5));
        let outcome = client.check_status().await;
        assert_eq!(outcome, Outcome::Open("Market is Open".into()));

        let request = handle.await.unwrap();
        assert!(request.starts_with("POST /api/marketStatus"), "{request}");
        assert!(
            request
                .to_ascii_lowercase()
                .contains("content-type: application/json"),
            "{request}"
        );
        assert!(request.contains(r#"{"param1":"value1"}"#), "{request}");
    }

    #[tokio::test]
    async fn closed_response_classified() {
        let (url, handle) = mock_server(200, r#"{"status":"Closed for Holiday"}"#).await;

        let client = client_for(&url, Duration::from_secs(5));
        assert_eq!(
            client.check_status().await,
            Outcome::Closed("Closed for Holiday".into())
        );

        handle.abort();
    }

    #[tokio::test]
    async fn server_error_preserves_code() {
        let (url, handle) = mock_server(503, r#"{"error":"maintenance"}"#).await;

        let client = client_for(&url, Duration::from_secs(5));
        assert_eq!(client.check_status().await, Outcome::ServerError(503));

        handle.abort();
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let (url, handle) = mock_server(200, "<html>maintenance</html>").await;

        let client = client_for(&url, Duration::from_secs(5));
        assert_eq!(
            client.check_status().await,
            Outcome::ParseError(ParseFailure::Malformed)
        );

        handle.abort();
    }

    #[tokio::test]
    async fn missing_status_is_parse_error() {
        let (url, handle) = mock_server(200, r#"{"marketOpen":true}"#).await;

        let client = client_for(&url, Duration::from_secs(5));
        assert_eq!(
            client.check_status().await,
            Outcome::ParseError(ParseFailure::MissingStatus)
        );

        handle.abort();
    }

    #[tokio::test]
    async fn hung_server_times_out() {
        let (url, handle) = silent_server().await;

        let client = client_for(&url, Duration::from_millis(200));
        assert_eq!(
            client.check_status().await,
            Outcome::NetworkError(NetworkReason::Timeout)
        );

        handle.abort();
    }

    #[tokio::test]
    async fn refused_connection_is_host_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = client_for(
            &format!("http://127.0.0.1:{port}/api/marketStatus"),
            Duration::from_secs(5),
        );
        assert_eq!(
            client.check_status().await,
            Outcome::NetworkError(NetworkReason::HostUnreachable)
        );
    }

    #[tokio::test]
    async fn trait_object_delegates() {
        let (url, handle) = mock_server(200, r#"{"status":"Pre-Open"}"#).await;

        let source: Box<dyn StatusSource> = Box::new(client_for(&url, Duration::from_secs(5)));
        assert_eq!(source.check().await, Outcome::Open("Pre-Open".into()));

        handle.abort();
    }

    #[test]
    fn invalid_endpoint_rejected() {
        let err = StatusClient::new(&PollerConfig::with_endpoint("not a url"))
            .err()
            .unwrap();
        assert!(matches!(err, PollerError::InvalidEndpoint { .. }));
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn default_endpoint_parses() {
        let client = StatusClient::new(&PollerConfig::default()).unwrap();
        assert_eq!(client.endpoint().host_str(), Some("www.cse.lk"));
        assert_eq!(client.endpoint().path(), "/api/marketStatus");
    }
}
