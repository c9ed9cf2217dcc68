use romeotag_core::{CoreError, ExitCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API request to {endpoint} failed with status code: {status}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl SyncError {
    /// Transport-level failures, as opposed to bad input or bad data.
    pub fn is_network(&self) -> bool {
        matches!(self, SyncError::Http(_) | SyncError::Api { .. })
    }

    pub fn exit_code(&self) -> ExitCode {
        match self {
            _ if self.is_network() => ExitCode::NetworkError,
            SyncError::Core(CoreError::CollectionNotFound(_)) => ExitCode::NotFound,
            SyncError::InvalidInput(_) => ExitCode::InvalidArgs,
            _ => ExitCode::GeneralError,
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_kind() {
        let api = SyncError::Api {
            endpoint: "https://api.zotero.org/users/1/items".to_string(),
            status: 403,
            body: String::new(),
        };
        assert_eq!(api.exit_code(), ExitCode::NetworkError);

        let missing = SyncError::from(CoreError::CollectionNotFound("Thesis".to_string()));
        assert_eq!(missing.exit_code().code(), 2);

        assert_eq!(SyncError::Parse("bad feed".to_string()).exit_code(), ExitCode::GeneralError);
    }
}
