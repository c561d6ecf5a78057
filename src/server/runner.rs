// ────────────────────────────────
// src/server/runner.rs
// Lifecycle of the embedded healthcheck endpoint.
// ────────────────────────────────
use super::handler::RequestHandler;
use super::listener::bind_tcp;
use super::ServerError;
use crate::config::ServerConfig;
use crate::health::Checker;
use hyper::server::conn::Http;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{info, warn};

/// Single-route HTTP listener over a shared [`Checker`].
///
/// Only one accept loop may run at a time; [`HealthcheckServer::stop`]
/// ends it and the server can then be started again.
pub struct HealthcheckServer {
    checker: Arc<Checker>,
    config: ServerConfig,
    running: AtomicBool,
    shutdown_tx: watch::Sender<bool>,
}

/// Handle to an accept loop spawned by [`HealthcheckServer::start`].
pub struct RunningServer {
    local_addr: SocketAddr,
    task: JoinHandle<Result<(), ServerError>>,
}

impl RunningServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Waits until the accept loop exits.
    pub async fn wait(self) -> Result<(), ServerError> {
        self.task.await?
    }
}

impl HealthcheckServer {
    pub fn new(checker: Arc<Checker>, config: ServerConfig) -> Self {
        let (shutdown_tx, _) = watch::channel(false);

        Self {
            checker,
            config,
            running: AtomicBool::new(false),
            shutdown_tx,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Binds the listener and spawns the accept loop, returning once the
    /// socket is bound.
    pub async fn start(self: &Arc<Self>) -> Result<RunningServer, ServerError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(ServerError::AlreadyRunning);
        }

        let listener = match bind_tcp(&self.config.addr()).await {
            Ok(listener) => listener,
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };
        let local_addr = match listener.local_addr() {
            Ok(addr) => addr,
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                return Err(e.into());
            }
        };

        self.shutdown_tx.send_replace(false);
        let shutdown_rx = self.shutdown_tx.subscribe();

        info!(
            "Healthcheck server listening on http://{}{}",
            local_addr, self.config.path
        );

        let server = self.clone();
        let task = tokio::spawn(async move {
            let result = server.accept_loop(listener, shutdown_rx).await;
            server.running.store(false, Ordering::SeqCst);
            result
        });

        Ok(RunningServer { local_addr, task })
    }

    /// Starts the server and serves until [`HealthcheckServer::stop`].
    pub async fn run(self: &Arc<Self>) -> Result<(), ServerError> {
        self.start().await?.wait().await
    }

    pub fn stop(&self) {
        self.shutdown_tx.send_replace(true);
    }

    async fn accept_loop(
        &self,
        listener: TcpListener,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Result<(), ServerError> {
        let handler = RequestHandler::new(self.checker.clone(), &self.config.path);
        let mut connections = JoinSet::new();
        let stopping = stop_requested(shutdown_rx.clone());
        tokio::pin!(stopping);

        let result = loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(accepted) => accepted,
                        Err(e) => break Err(e.into()),
                    };
                    let svc = handler.clone();
                    let conn_shutdown = shutdown_rx.clone();

                    // One Tokio task per connection, closed gracefully on stop.
                    connections.spawn(async move {
                        let conn = Http::new().serve_connection(stream, svc);
                        tokio::pin!(conn);

                        let served = tokio::select! {
                            served = conn.as_mut() => served,
                            _ = stop_requested(conn_shutdown) => {
                                conn.as_mut().graceful_shutdown();
                                conn.await
                            }
                        };
                        if let Err(err) = served {
                            warn!(%peer, %err, "connection error");
                        }
                    });
                }
                Some(_) = connections.join_next(), if !connections.is_empty() => {}
                _ = &mut stopping => {
                    info!("Healthcheck server shutting down");
                    break Ok(());
                }
            }
        };

        // Refuse new connections before draining the open ones.
        drop(listener);
        self.shutdown_tx.send_replace(true);
        while connections.join_next().await.is_some() {}

        result
    }
}

/// Resolves once a stop has been requested on `shutdown_rx`.
async fn stop_requested(mut shutdown_rx: watch::Receiver<bool>) {
    while !*shutdown_rx.borrow_and_update() {
        if shutdown_rx.changed().await.is_err() {
            return;
        }
    }
}
