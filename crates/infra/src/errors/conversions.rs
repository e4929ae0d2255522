//! Conversions from external infrastructure errors into domain errors.

use profilesync_domain::ProfileSyncError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;
use serde_json::Error as JsonError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ProfileSyncError);

impl From<InfraError> for ProfileSyncError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ProfileSyncError> for InfraError {
    fn from(value: ProfileSyncError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoProfileSyncError {
    fn into_domain(self) -> ProfileSyncError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → ProfileSyncError */
/* -------------------------------------------------------------------------- */

impl IntoProfileSyncError for SqlError {
    fn into_domain(self) -> ProfileSyncError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        ProfileSyncError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        ProfileSyncError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 1555 | 2067) => {
                        ProfileSyncError::Database("unique constraint violation".into())
                    }
                    (ErrorCode::NotADatabase, _) => {
                        ProfileSyncError::Database("file is not a SQLite database".into())
                    }
                    _ => ProfileSyncError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => {
                ProfileSyncError::NotFound("no rows returned by query".into())
            }
            RE::FromSqlConversionFailure(_, _, cause) => {
                ProfileSyncError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                ProfileSyncError::Database(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => {
                ProfileSyncError::Database("invalid UTF-8 returned from sqlite".into())
            }
            RE::InvalidPath(path) => ProfileSyncError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => ProfileSyncError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_domain())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → ProfileSyncError */
/* -------------------------------------------------------------------------- */

impl IntoProfileSyncError for r2d2::Error {
    fn into_domain(self) -> ProfileSyncError {
        ProfileSyncError::Database(format!("connection pool error: {self}"))
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(value.into_domain())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ProfileSyncError */
/* -------------------------------------------------------------------------- */

impl IntoProfileSyncError for HttpError {
    fn into_domain(self) -> ProfileSyncError {
        if self.is_timeout() {
            return ProfileSyncError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return ProfileSyncError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return ProfileSyncError::Decode(format!("response body could not be decoded: {self}"));
        }

        if self.is_builder() {
            return ProfileSyncError::InvalidInput(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                404 => ProfileSyncError::NotFound(message),
                400..=499 if code != 408 && code != 429 => ProfileSyncError::InvalidInput(message),
                _ => ProfileSyncError::Network(message),
            };
        }

        ProfileSyncError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_domain())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → ProfileSyncError */
/* -------------------------------------------------------------------------- */

impl IntoProfileSyncError for JsonError {
    fn into_domain(self) -> ProfileSyncError {
        ProfileSyncError::Decode(format!(
            "invalid JSON at line {} column {}: {self}",
            self.line(),
            self.column()
        ))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_domain())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
