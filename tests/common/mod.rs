//! Shared utilities for integration testing against a mock ledger endpoint.

#![allow(dead_code)]

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Devnet throwaway key used across tests. Never use outside tests.
pub const TEST_SECRET: &str = "80,83,11,9,145,1,91,144,244,223,98,141,59,249,88,33,153,25,201,147,156,91,95,119,243,156,94,140,196,71,237,36,63,108,109,236,195,131,233,185,220,251,212,47,126,10,250,90,192,76,94,87,130,78,96,21,245,253,63,34,12,116,126,191";

/// Public key derived from `TEST_SECRET`.
pub const TEST_PUBKEY: &str = "5Gaafgd2mZiiuVU7ZJyua3pbfXX6c7hGsY2y6ipCrXca";

/// How the mock answers one JSON-RPC call.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// `{"result": value}`
    Result(Value),
    /// `{"error": {"code", "message"}}`
    RpcError(i64, String),
    /// Bare HTTP status with a text body.
    Http(u16, String),
    /// 200 with an arbitrary, possibly malformed, body.
    Raw(String),
    /// Answer with `result` after a delay.
    Delayed(Duration, Value),
}

type Handler = Arc<dyn Fn(&str, &Value) -> MockReply + Send + Sync>;

/// Start a programmable JSON-RPC endpoint on an ephemeral port.
///
/// `handler` receives the method name and params of every request.
pub async fn start_mock_ledger<F>(handler: F) -> SocketAddr
where
    F: Fn(&str, &Value) -> MockReply + Send + Sync + 'static,
{
    let handler: Handler = Arc::new(handler);
    let app = Router::new().route("/", post(rpc)).with_state(handler);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    addr
}

async fn rpc(State(handler): State<Handler>, Json(body): Json<Value>) -> Response {
    let id = body.get("id").cloned().unwrap_or(Value::Null);
    let method = body.get("method").and_then(Value::as_str).unwrap_or_default().to_string();
    let params = body.get("params").cloned().unwrap_or(Value::Null);

    match handler(&method, &params) {
        MockReply::Result(result) => {
            Json(json!({"jsonrpc": "2.0", "id": id, "result": result})).into_response()
        }
        MockReply::RpcError(code, message) => Json(json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {"code": code, "message": message}
        }))
        .into_response(),
        MockReply::Http(status, text) => {
            (StatusCode::from_u16(status).unwrap(), text).into_response()
        }
        MockReply::Raw(text) => (StatusCode::OK, text).into_response(),
        MockReply::Delayed(delay, result) => {
            tokio::time::sleep(delay).await;
            Json(json!({"jsonrpc": "2.0", "id": id, "result": result})).into_response()
        }
    }
}

/// Start a listener that accepts connections and never answers.
pub async fn start_silent_endpoint() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// `getVersion` result as a real node reports it.
pub fn version_result() -> Value {
    json!({"solana-core": "1.18.22", "feature-set": 4215500110u32})
}

pub fn url(addr: SocketAddr) -> String {
    format!("http://{}", addr)
}
