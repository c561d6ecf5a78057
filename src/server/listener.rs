// ────────────────────────────────
// src/server/listener.rs
// Encapsulates low‑level TCP bind so bind failures carry the address.
// ────────────────────────────────
use super::ServerError;
use tokio::net::TcpListener;

pub async fn bind_tcp(addr: &str) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })
}
