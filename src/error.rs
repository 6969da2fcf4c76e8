use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventAgentError {
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Log file setup failed: {0}")]
    Logging(#[from] tracing_appender::rolling::InitError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Events file not found at {}. Run the fetch script first.", path.display())]
    DataFileMissing { path: PathBuf },

    #[error("Events file root must be a JSON array, found {found}")]
    InvalidRoot { found: &'static str },

    #[error("Invalid date '{input}', expected YYYY-MM-DD: {source}")]
    InvalidDate {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
}

pub type Result<T> = std::result::Result<T, EventAgentError>;
