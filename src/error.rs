use reqwest::StatusCode;
use thiserror::Error;

/// Failure of the one read-all query against a listing source
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to listing backend failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("listing backend rejected credentials ({0})")]
    Unauthorized(StatusCode),

    #[error("listing backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to decode listings: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to read listings file: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// Classifies a non-success HTTP status
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Unauthorized(status),
            _ => Self::Status { status, body },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_statuses_are_unauthorized() {
        assert!(matches!(
            FetchError::from_status(StatusCode::UNAUTHORIZED, String::new()),
            FetchError::Unauthorized(StatusCode::UNAUTHORIZED)
        ));
        assert!(matches!(
            FetchError::from_status(StatusCode::FORBIDDEN, String::new()),
            FetchError::Unauthorized(_)
        ));
    }

    #[test]
    fn other_statuses_keep_body() {
        let err = FetchError::from_status(StatusCode::NOT_FOUND, "no table".to_string());
        assert_eq!(
            err.to_string(),
            "listing backend returned 404 Not Found: no table"
        );
    }
}
