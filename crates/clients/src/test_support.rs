//! Local HTTP server standing in for the gateway in client tests.

use axum::Router;

use crate::{GatewayClient, ServiceConfig};

pub const SECRET: &str = "test-secret";

/// Serve `router` on an ephemeral port and return a client pointed at it.
pub async fn spawn_gateway(router: Router) -> GatewayClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    GatewayClient::new(ServiceConfig::new(format!("http://{addr}"), SECRET))
}
