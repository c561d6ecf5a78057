pub mod handler;
pub mod listener;
pub mod runner;

pub use handler::RequestHandler;
pub use runner::{HealthcheckServer, RunningServer};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Can not run healthcheck server twice")]
    AlreadyRunning,

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
