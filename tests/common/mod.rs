//! Shared utilities for integration tests.

use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

use survey_server::net::{Listener, ListenerError};
use survey_server::{IdentityStore, Shutdown, SurveyConfig, SurveyServer};

/// A running server on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: IdentityStore,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), ListenerError>>,
}

/// Start a server with default settings.
pub async fn start_server() -> TestServer {
    start_server_with(SurveyConfig::default()).await
}

/// Start a server with `config`, bound to 127.0.0.1 on a free port.
pub async fn start_server_with(mut config: SurveyConfig) -> TestServer {
    config.listener.bind_address = "127.0.0.1:0".into();
    let listener = Listener::bind(&config.listener).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let store = IdentityStore::new();
    let server = SurveyServer::with_store(config, store.clone());
    let shutdown = Shutdown::new();
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    TestServer {
        addr,
        store,
        shutdown,
        handle,
    }
}

/// Write `request` in one go and read until the server closes.
pub async fn send_raw(addr: SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

#[allow(dead_code)]
pub async fn get(addr: SocketAddr, path: &str) -> String {
    send_raw(
        addr,
        &format!("GET {} HTTP/1.1\r\nHost: {}\r\n\r\n", path, addr),
    )
    .await
}

#[allow(dead_code)]
pub async fn post(addr: SocketAddr, path: &str, body: &str) -> String {
    send_raw(
        addr,
        &format!(
            "POST {} HTTP/1.1\r\nHost: {}\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\n\r\n{}",
            path,
            addr,
            body.len(),
            body
        ),
    )
    .await
}

/// Value of the `Location` header, if any.
#[allow(dead_code)]
pub fn location(response: &str) -> Option<&str> {
    response
        .lines()
        .find_map(|line| line.strip_prefix("Location: "))
}
