//! Shared utilities for integration testing: a minimal JSON-RPC node.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::hex;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Account the node reports from `eth_accounts` (Anvil's first account).
pub const NODE_ACCOUNT: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// How the node answers one JSON-RPC call.
#[derive(Debug, Clone)]
pub enum Reply {
    Result(Value),
    Error(i64, &'static str),
    /// Never answer; the connection stays open until the client gives up.
    Hang,
}

/// Answers for the calls alloy makes while connecting and filling a
/// transaction. Anything else is "method not found".
pub fn standard_reply(method: &str) -> Reply {
    match method {
        "eth_chainId" => Reply::Result(json!("0x38")),
        "eth_accounts" => Reply::Result(json!([NODE_ACCOUNT])),
        "eth_getTransactionCount" => Reply::Result(json!("0x0")),
        "eth_estimateGas" => Reply::Result(json!("0x5208")),
        "eth_gasPrice" | "eth_maxPriorityFeePerGas" => Reply::Result(json!("0x3b9aca00")),
        "eth_feeHistory" => Reply::Result(json!({
            "oldestBlock": "0x1",
            "baseFeePerGas": ["0x3b9aca00", "0x3b9aca00"],
            "gasUsedRatio": [0.5],
            "reward": [["0x3b9aca00"]]
        })),
        "eth_blockNumber" => Reply::Result(json!("0x10")),
        _ => Reply::Error(-32601, "Method not found"),
    }
}

/// ABI-encoded return data as an `eth_call` result.
pub fn call_result(encoded: Vec<u8>) -> Reply {
    Reply::Result(json!(hex::encode_prefixed(encoded)))
}

/// Function selector of an `eth_call` request, if it carries calldata.
pub fn call_selector(params: &Value) -> Option<[u8; 4]> {
    let tx = params.get(0)?;
    let input = tx.get("input").or_else(|| tx.get("data"))?.as_str()?;
    let bytes = hex::decode(input).ok()?;
    bytes.get(..4)?.try_into().ok()
}

/// Start a JSON-RPC node on a free local port and return its URL.
///
/// `handler` sees every call first; returning `None` falls back to
/// [`standard_reply`].
pub async fn start_node<F>(handler: F) -> String
where
    F: Fn(&str, &Value) -> Option<Reply> + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        serve(socket, handler.as_ref()).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    url
}

async fn serve<F>(mut socket: TcpStream, handler: &F)
where
    F: Fn(&str, &Value) -> Option<Reply>,
{
    let Some(body) = read_body(&mut socket).await else {
        return;
    };
    let Ok(request) = serde_json::from_slice::<Value>(&body) else {
        return;
    };

    let response = match request {
        Value::Array(calls) => {
            let mut replies = Vec::with_capacity(calls.len());
            for call in &calls {
                match answer(call, handler) {
                    Some(reply) => replies.push(reply),
                    None => return hang().await,
                }
            }
            Value::Array(replies)
        }
        call => match answer(&call, handler) {
            Some(reply) => reply,
            None => return hang().await,
        },
    };

    let body = response.to_string();
    let response_str = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    let _ = socket.write_all(response_str.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// JSON-RPC response for one call; `None` when the node should hang.
fn answer<F>(call: &Value, handler: &F) -> Option<Value>
where
    F: Fn(&str, &Value) -> Option<Reply>,
{
    let id = call.get("id").cloned().unwrap_or(Value::Null);
    let method = call.get("method").and_then(Value::as_str).unwrap_or_default();
    let params = call.get("params").cloned().unwrap_or(Value::Null);

    let reply = handler(method, &params).unwrap_or_else(|| standard_reply(method));
    match reply {
        Reply::Result(result) => Some(json!({ "jsonrpc": "2.0", "id": id, "result": result })),
        Reply::Error(code, message) => Some(json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": code, "message": message }
        })),
        Reply::Hang => None,
    }
}

async fn hang() {
    tokio::time::sleep(Duration::from_secs(60)).await;
}

/// Read one HTTP request and return its body.
async fn read_body(socket: &mut TcpStream) -> Option<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = headers
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Some(buf[header_end..header_end + content_length].to_vec())
}
