use thiserror::Error;

/// All errors that can occur in romeotag-core.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid scope: {0} (expected 'user' or 'group')")]
    InvalidScope(String),

    #[error("Invalid record payload for {key}: {reason}")]
    InvalidPayload { key: String, reason: String },

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Process exit codes used by the CLI.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    GeneralError = 1,
    NotFound = 2,
    InvalidArgs = 3,
    NetworkError = 6,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
