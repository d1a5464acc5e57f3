//! Helper functions for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use hostcheck::checks::PingCommand;
use hostcheck::config::{HostConfig, HttpConfig, IcmpConfig, TcpConfig};
use hostcheck::{CheckRunner, IdAllocator, ResultStore, RunContext};
use wiremock::MockServer;

pub fn icmp(timeout: u64) -> Option<IcmpConfig> {
    Some(IcmpConfig {
        enabled: true,
        timeout,
    })
}

pub fn http(timeout: u64, port: u16) -> Option<HttpConfig> {
    Some(HttpConfig {
        enabled: true,
        timeout,
        port,
    })
}

pub fn tcp(timeout: u64, port: u16) -> Option<TcpConfig> {
    Some(TcpConfig {
        enabled: true,
        timeout,
        port: Some(port),
    })
}

pub fn bare_host(hostname: &str) -> HostConfig {
    HostConfig {
        hostname: hostname.to_string(),
        ..Default::default()
    }
}

/// Host and port a wiremock server listens on
pub fn mock_address(mock_server: &MockServer) -> (String, u16) {
    let mock_url = url::Url::parse(&mock_server.uri()).unwrap();
    (
        mock_url.host_str().unwrap().to_string(),
        mock_url.port().unwrap(),
    )
}

/// A local port nothing listens on
pub async fn closed_port() -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

/// Ping stand-in that prints `output` and exits successfully
pub fn echo_ping(output: &str) -> PingCommand {
    PingCommand::new("echo", [output])
}

/// Ping stand-in that always reports a reply
pub fn replying_ping() -> PingCommand {
    echo_ping("64 bytes from {host}: icmp_seq=1 ttl=64 time=0.1 ms")
}

/// Ping stand-in that never reports a reply
pub fn silent_ping() -> PingCommand {
    echo_ping("Request timeout for icmp_seq 0")
}

pub fn runner(store: Arc<dyn ResultStore>, ping: Option<PingCommand>) -> CheckRunner {
    CheckRunner::new(RunContext::new(store, IdAllocator::default(), ping).unwrap())
}
