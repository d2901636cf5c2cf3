//! Survey server: accept loop and per-connection handling.
//!
//! # Responsibilities
//! - Accept connections from the bounded listener
//! - Spawn one task per connection: read, decode, dispatch, write, close
//! - Log and swallow per-connection failures
//! - Stop accepting on shutdown and drain in-flight connections

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast;
use tracing::Instrument;

use crate::config::SurveyConfig;
use crate::http::request::{decode_request, Method};
use crate::http::response::Response;
use crate::http::router::Dispatcher;
use crate::net::connection::{read_request, ConnectionError, ConnectionId, ConnectionTracker};
use crate::net::listener::{Listener, ListenerError};
use crate::observability::metrics;
use crate::survey::IdentityStore;

/// Per-request bounds applied while reading.
#[derive(Debug, Clone, Copy)]
pub struct RequestLimits {
    pub max_bytes: usize,
    pub read_timeout: Duration,
}

impl RequestLimits {
    pub fn from_config(config: &SurveyConfig) -> Self {
        Self {
            max_bytes: config.site.max_request_bytes,
            read_timeout: Duration::from_secs(config.timeouts.read_secs),
        }
    }
}

/// The survey HTTP server.
///
/// Owns the identity store for the life of the process; connections only
/// borrow it through the dispatcher.
pub struct SurveyServer {
    config: Arc<SurveyConfig>,
    dispatcher: Dispatcher,
    tracker: ConnectionTracker,
}

impl SurveyServer {
    /// Create a server with an empty identity store.
    pub fn new(config: SurveyConfig) -> Self {
        Self::with_store(config, IdentityStore::new())
    }

    /// Create a server around an existing store.
    pub fn with_store(config: SurveyConfig, store: IdentityStore) -> Self {
        let dispatcher = Dispatcher::new(store, config.site.public_url.clone());
        Self {
            config: Arc::new(config),
            dispatcher,
            tracker: ConnectionTracker::new(),
        }
    }

    pub fn store(&self) -> &IdentityStore {
        self.dispatcher.store()
    }

    pub fn config(&self) -> &SurveyConfig {
        &self.config
    }

    /// Run the accept loop until `shutdown` fires, then drain connections.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ListenerError> {
        let addr = listener.local_addr().map_err(ListenerError::Bind)?;
        tracing::info!(address = %addr, "Survey server starting");

        let limits = RequestLimits::from_config(&self.config);

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, no longer accepting");
                    break;
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer, permit)) => {
                        let guard = self.tracker.track();
                        let dispatcher = self.dispatcher.clone();
                        let span = tracing::info_span!(
                            "connection",
                            connection_id = %guard.id(),
                            peer_addr = %peer,
                        );
                        tokio::spawn(
                            async move {
                                handle_connection(stream, guard.id(), &dispatcher, limits).await;
                                drop(permit);
                                drop(guard);
                            }
                            .instrument(span),
                        );
                    }
                    Err(ListenerError::Closed) => return Err(ListenerError::Closed),
                    Err(e) => {
                        tracing::warn!(error = %e, "Accept failed");
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                },
            }
        }

        let grace = Duration::from_secs(self.config.timeouts.shutdown_grace_secs);
        if self.tracker.wait_for_idle(grace).await {
            tracing::info!("All connections drained");
        } else {
            tracing::warn!(
                active_connections = self.tracker.active_count(),
                "Shutdown grace period elapsed with connections still open"
            );
        }

        tracing::info!("Survey server stopped");
        Ok(())
    }
}

/// Serve exactly one request on `stream`, then close it.
///
/// Errors never reach the peer; they are logged and the stream is dropped.
pub async fn handle_connection<S>(
    mut stream: S,
    id: ConnectionId,
    dispatcher: &Dispatcher,
    limits: RequestLimits,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let raw = match read_request(&mut stream, limits.max_bytes, limits.read_timeout).await {
        Ok(raw) => raw,
        Err(ConnectionError::Empty) => {
            tracing::debug!(connection_id = %id, "Peer closed before sending a request");
            return;
        }
        Err(e) => {
            tracing::warn!(connection_id = %id, error = %e, "Dropping connection");
            return;
        }
    };

    let start_time = Instant::now();
    let request = decode_request(&raw);
    let response = dispatcher.dispatch(&request);

    let method_label = match request.method {
        Method::Get | Method::Post => request.method.as_str(),
        Method::Other(_) => "OTHER",
    };
    metrics::record_request(method_label, response.status.code(), start_time);
    tracing::info!(
        connection_id = %id,
        method = %request.method,
        path = %request.path,
        status = response.status.code(),
        "Request handled"
    );

    if let Err(e) = write_response(&mut stream, &response).await {
        tracing::warn!(connection_id = %id, error = %e, "Failed to write response");
    }
}

async fn write_response<S>(stream: &mut S, response: &Response) -> std::io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    stream.write_all(&response.to_bytes()).await?;
    stream.shutdown().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    fn limits() -> RequestLimits {
        RequestLimits {
            max_bytes: 4096,
            read_timeout: Duration::from_secs(1),
        }
    }

    async fn exchange(dispatcher: &Dispatcher, request: &str) -> String {
        let (mut client, server) = tokio::io::duplex(8192);
        client.write_all(request.as_bytes()).await.unwrap();

        handle_connection(server, ConnectionId::new(), dispatcher, limits()).await;

        let mut response = String::new();
        client.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn serves_one_request_and_closes() {
        let dispatcher = Dispatcher::new(IdentityStore::new(), "http://localhost:8000");
        let response = exchange(&dispatcher, "GET /homepage HTTP/1.1\r\n\r\n").await;
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("<h3>Sign in</h3>"));
    }

    #[tokio::test]
    async fn unknown_method_is_not_found() {
        let dispatcher = Dispatcher::new(IdentityStore::new(), "http://localhost:8000");
        let response = exchange(&dispatcher, "PATCH /signin HTTP/1.1\r\n\r\n").await;
        assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
    }

    #[tokio::test]
    async fn signin_over_stream_creates_identity() {
        let store = IdentityStore::new();
        let dispatcher = Dispatcher::new(store.clone(), "http://localhost:8000");
        let body = "username=carol&password=x";
        let request = format!(
            "POST /signin HTTP/1.1\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );

        let response = exchange(&dispatcher, &request).await;
        assert!(response.contains("Location: http://localhost:8000/input/carol\r\n"));
        assert!(store.contains("carol"));
    }

    #[test]
    fn limits_follow_config() {
        let mut config = SurveyConfig::default();
        config.site.max_request_bytes = 1000;
        config.timeouts.read_secs = 3;
        let limits = RequestLimits::from_config(&config);
        assert_eq!(limits.max_bytes, 1000);
        assert_eq!(limits.read_timeout, Duration::from_secs(3));
    }
}
