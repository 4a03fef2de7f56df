//! Counting in-memory readers and a canned JSON-RPC server for unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use alloy::primitives::{Address, B256};
use async_trait::async_trait;

use crate::client::{BlockReader, CheckpointReader};
use crate::error::{BlockLookupError, CheckpointError};
use crate::types::{BlockLookup, SourceBlock, SyncCheckpoint};

/// Checkpoint at slot 0 pointing at `block_hash`
pub fn checkpoint_at(block_hash: B256, remote_block_id: u64) -> SyncCheckpoint {
    SyncCheckpoint {
        slot: 0,
        remote_block_id,
        block_hash,
        signal_root: B256::ZERO,
    }
}

#[derive(Debug, Clone, Copy)]
enum CheckpointResponse {
    Ok(SyncCheckpoint),
    Transport,
    Reverted,
}

/// Checkpoint reader returning a fixed response
pub struct StaticCheckpointReader {
    response: Mutex<CheckpointResponse>,
    calls: AtomicUsize,
    last_request: Mutex<Option<(Address, u64)>>,
}

impl StaticCheckpointReader {
    fn with(response: CheckpointResponse) -> Self {
        Self {
            response: Mutex::new(response),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn ok(checkpoint: SyncCheckpoint) -> Self {
        Self::with(CheckpointResponse::Ok(checkpoint))
    }

    pub fn transport_error() -> Self {
        Self::with(CheckpointResponse::Transport)
    }

    pub fn reverted() -> Self {
        Self::with(CheckpointResponse::Reverted)
    }

    pub fn set_checkpoint(&self, checkpoint: SyncCheckpoint) {
        *self.response.lock().unwrap() = CheckpointResponse::Ok(checkpoint);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<(Address, u64)> {
        *self.last_request.lock().unwrap()
    }
}

#[async_trait]
impl CheckpointReader for StaticCheckpointReader {
    async fn synced_snippet(
        &self,
        oracle: Address,
        slot: u64,
    ) -> Result<SyncCheckpoint, CheckpointError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some((oracle, slot));

        let response = *self.response.lock().unwrap();
        match response {
            CheckpointResponse::Ok(checkpoint) => Ok(checkpoint),
            CheckpointResponse::Transport => Err(CheckpointError::Transport {
                oracle,
                message: "connection refused".to_string(),
            }),
            CheckpointResponse::Reverted => Err(CheckpointError::Reverted {
                oracle,
                message: "execution reverted".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum BlockResponse {
    Found(Option<u64>),
    NotFound,
    Transport,
}

/// Block reader returning a fixed response for any hash
pub struct StaticBlockReader {
    response: Mutex<BlockResponse>,
    calls: AtomicUsize,
    last_hash: Mutex<Option<B256>>,
}

impl StaticBlockReader {
    fn with(response: BlockResponse) -> Self {
        Self {
            response: Mutex::new(response),
            calls: AtomicUsize::new(0),
            last_hash: Mutex::new(None),
        }
    }

    pub fn at_height(height: u64) -> Self {
        Self::with(BlockResponse::Found(Some(height)))
    }

    pub fn without_height() -> Self {
        Self::with(BlockResponse::Found(None))
    }

    pub fn not_found() -> Self {
        Self::with(BlockResponse::NotFound)
    }

    pub fn transport_error() -> Self {
        Self::with(BlockResponse::Transport)
    }

    pub fn set_height(&self, height: u64) {
        *self.response.lock().unwrap() = BlockResponse::Found(Some(height));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_hash(&self) -> Option<B256> {
        *self.last_hash.lock().unwrap()
    }
}

#[async_trait]
impl BlockReader for StaticBlockReader {
    async fn block_by_hash(&self, hash: B256) -> Result<BlockLookup, BlockLookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_hash.lock().unwrap() = Some(hash);

        let response = *self.response.lock().unwrap();
        match response {
            BlockResponse::Found(number) => Ok(BlockLookup::Found(SourceBlock { hash, number })),
            BlockResponse::NotFound => Ok(BlockLookup::NotFound),
            BlockResponse::Transport => Err(BlockLookupError::Transport(
                "connection refused".to_string(),
            )),
        }
    }
}

// ============================================================================
// Canned JSON-RPC Server
// ============================================================================

/// Serve every request on a local port with `respond(request_body)`, after `delay`.
///
/// Returns the `http://` URL of the server. Responses close the connection.
pub async fn spawn_rpc_server<F>(delay: Duration, respond: F) -> String
where
    F: Fn(serde_json::Value) -> (u16, serde_json::Value) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let respond = Arc::new(respond);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let respond = respond.clone();
            tokio::spawn(async move {
                let request = read_request_body(&mut socket).await;
                tokio::time::sleep(delay).await;

                let (status, body) = respond(request);
                let body = body.to_string();
                let response = format!(
                    "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}", addr)
}

/// JSON-RPC success body answering `request`
pub fn rpc_result(request: &serde_json::Value, result: serde_json::Value) -> serde_json::Value {
    serde_json::json!({ "jsonrpc": "2.0", "id": request["id"], "result": result })
}

/// JSON-RPC error body answering `request`
pub fn rpc_error(request: &serde_json::Value, code: i64, message: &str) -> serde_json::Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": request["id"],
        "error": { "code": code, "message": message }
    })
}

/// URL of a local port with nothing listening on it
pub fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

async fn read_request_body(socket: &mut TcpStream) -> serde_json::Value {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            return serde_json::Value::Null;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
        let content_length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);

        let body_start = header_end + 4;
        if buf.len() >= body_start + content_length {
            return serde_json::from_slice(&buf[body_start..body_start + content_length])
                .unwrap_or(serde_json::Value::Null);
        }
    }
}
