// =============================================================================
// Error taxonomy for the snapshot pipeline
// =============================================================================
//
// Four failure kinds, surfaced to the caller so it can decide what to do:
//   InvalidArgument - bad symbol/limit/interval, caught before any network I/O
//   Transport       - connectivity failure or timeout
//   Response        - non-2xx status, or malformed/missing JSON fields
//   Persistence     - snapshot file write/read failure
//
// Fetch-time errors abort the whole snapshot; a composite built from partial
// market data would be misleading. Persistence errors are isolated to the
// save step and never invalidate a report already rendered.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("exchange response error: {0}")]
    Response(String),

    #[error("persistence error: {0}")]
    Persistence(String),
}

impl From<reqwest::Error> for SnapshotError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SnapshotError::Transport(format!("request timed out: {err}"))
        } else if err.is_connect() {
            SnapshotError::Transport(format!("connection failed: {err}"))
        } else if err.is_decode() {
            SnapshotError::Response(format!("malformed response body: {err}"))
        } else {
            SnapshotError::Transport(format!("http error: {err}"))
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(err: serde_json::Error) -> Self {
        SnapshotError::Response(format!("json parsing error: {err}"))
    }
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_carry_their_kind() {
        let e = SnapshotError::InvalidArgument("depth limit 7".into());
        assert!(e.to_string().starts_with("invalid argument"));

        let e = SnapshotError::Response("GET /api/v3/depth returned 404".into());
        assert!(e.to_string().starts_with("exchange response error"));

        let e = SnapshotError::Persistence("disk full".into());
        assert!(e.to_string().starts_with("persistence error"));
    }

    #[test]
    fn serde_errors_map_to_response() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let e: SnapshotError = json_err.into();
        assert!(matches!(e, SnapshotError::Response(_)));
    }
}
