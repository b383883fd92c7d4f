use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("DAEMON_RUNNING: A blockwatch daemon is already running (pid {0}). Stop it first.")]
    DaemonAlreadyRunning(u32),

    #[error("UNKNOWN_RULE: No blocking rule named '{0}'. Known rules: explore, reels.")]
    UnknownRule(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
