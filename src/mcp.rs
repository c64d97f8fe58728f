//! MCP JSON-RPC protocol handler (stdio).
//!
//! Reads newline-delimited JSON-RPC 2.0 messages from stdin and writes
//! responses to stdout, one per line. Each request runs on its own task;
//! a single writer task owns stdout so responses never interleave.
//! Logging must stay on stderr while this runs.

use anyhow::Context;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::tools::{TvTools, tool_definitions};

pub const SERVER_NAME: &str = "tv_control";
pub const PROTOCOL_VERSION: &str = "2024-11-05";

const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Deserialize)]
struct Request {
    /// `None` only when the member is absent; `"id": null` is `Some(Value::Null)`
    #[serde(default, deserialize_with = "present")]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Serve tools over stdin/stdout until stdin closes
pub async fn run_stdio(tools: TvTools) -> anyhow::Result<()> {
    serve(tools, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}

/// Serve newline-delimited JSON-RPC from `reader` to `writer` until EOF.
///
/// A line that is not UTF-8 gets a parse error response; the loop keeps going.
pub async fn serve<R, W>(tools: TvTools, mut reader: R, writer: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Value>();

    let writer = tokio::spawn(async move {
        let mut writer = writer;
        while let Some(message) = rx.recv().await {
            let mut line = serde_json::to_string(&message)?;
            line.push('\n');
            writer.write_all(line.as_bytes()).await?;
            writer.flush().await?;
        }
        writer.shutdown().await?;
        Ok::<_, anyhow::Error>(())
    });

    let mut buf = Vec::new();
    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf).await.context("reading input")?;
        if n == 0 {
            break;
        }

        let line = match String::from_utf8(std::mem::take(&mut buf)) {
            Ok(line) => line,
            Err(e) => {
                warn!("Non UTF-8 message: {}", e);
                let _ = tx.send(error_response(Value::Null, PARSE_ERROR, format!("Parse error: {}", e)));
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let tx = tx.clone();
        tokio::spawn(async move {
            if let Some(response) = handle_message(&tools, &line).await {
                let _ = tx.send(response);
            }
        });
    }

    info!("input closed, shutting down");
    drop(tx);
    writer.await.context("output writer task")??;
    Ok(())
}

/// Handle one raw JSON-RPC line. Notifications produce no response.
pub async fn handle_message(tools: &TvTools, line: &str) -> Option<Value> {
    let raw: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            warn!("Unparseable message: {}", e);
            return Some(error_response(Value::Null, PARSE_ERROR, format!("Parse error: {}", e)));
        }
    };

    let request: Request = match serde_json::from_value(raw) {
        Ok(r) => r,
        Err(e) => {
            return Some(error_response(Value::Null, INVALID_REQUEST, format!("Invalid request: {}", e)));
        }
    };

    let Some(id) = request.id else {
        debug!("Notification: {}", request.method);
        return None;
    };

    debug!("Request {}: {}", id, request.method);
    let outcome = match request.method.as_str() {
        "initialize" => Ok(initialize_result(&request.params)),
        "ping" => Ok(json!({})),
        "tools/list" => Ok(json!({ "tools": tool_definitions() })),
        "tools/call" => call_tool(tools, request.params).await,
        other => Err((METHOD_NOT_FOUND, format!("Method not found: {}", other))),
    };

    Some(match outcome {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err((code, message)) => error_response(id, code, message),
    })
}

fn initialize_result(params: &Value) -> Value {
    let protocol_version = params
        .get("protocolVersion")
        .and_then(Value::as_str)
        .unwrap_or(PROTOCOL_VERSION);

    json!({
        "protocolVersion": protocol_version,
        "capabilities": { "tools": {} },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

async fn call_tool(tools: &TvTools, params: Value) -> Result<Value, (i64, String)> {
    let name = params
        .get("name")
        .and_then(Value::as_str)
        .ok_or((INVALID_PARAMS, "Missing tool name".to_string()))?;
    let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

    let text = tools
        .call(name, arguments)
        .await
        .map_err(|e| (INVALID_PARAMS, e.to_string()))?;

    Ok(json!({
        "content": [{ "type": "text", "text": text }],
        "isError": false
    }))
}

fn error_response(id: Value, code: i64, message: String) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": code, "message": message }
    })
}
