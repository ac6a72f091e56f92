//! Error types shared by the Supabase storage implementation.

use reqwest::StatusCode;
use thiserror::Error;

use crate::dao::storage::StorageError;

/// Convenient result alias returning [`SupabaseError`] failures.
pub type SupabaseResult<T> = Result<T, SupabaseError>;

/// Failures that can occur while talking to the Supabase REST API.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// Required environment variable is missing.
    #[error("missing Supabase environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build Supabase client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// A request to a table endpoint could not be sent.
    #[error("failed to send Supabase request to `{path}`")]
    RequestSend {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// Supabase returned an unexpected status code.
    #[error("unexpected Supabase response status {status} for `{path}`")]
    RequestStatus { path: String, status: StatusCode },
    /// Response payload could not be decoded into the expected rows.
    #[error("failed to decode Supabase response for `{path}`")]
    DecodeResponse {
        path: String,
        #[source]
        source: reqwest::Error,
    },
}

impl From<SupabaseError> for StorageError {
    fn from(err: SupabaseError) -> Self {
        if let SupabaseError::RequestStatus { status, .. } = &err {
            let refused = status.is_client_error()
                && *status != StatusCode::UNAUTHORIZED
                && *status != StatusCode::FORBIDDEN;
            if refused {
                return StorageError::Rejected {
                    status: status.as_u16(),
                    message: err.to_string(),
                };
            }
        }
        StorageError::unavailable(err.to_string(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_rejections() {
        let err = SupabaseError::RequestStatus {
            path: "game_league".into(),
            status: StatusCode::BAD_REQUEST,
        };
        assert!(!StorageError::from(err).is_connectivity());
    }

    #[test]
    fn auth_and_server_errors_are_connectivity() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::BAD_GATEWAY] {
            let err = SupabaseError::RequestStatus {
                path: "game_league".into(),
                status,
            };
            assert!(StorageError::from(err).is_connectivity());
        }
        let err = SupabaseError::MissingEnvVar {
            var: "APP_SUPABASE_URL",
        };
        assert!(StorageError::from(err).is_connectivity());
    }
}
