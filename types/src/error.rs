use serde::{Deserialize, Serialize};

use crate::{role::RouteError, upload::UploadError};

pub type Result<T, E = Error> = std::result::Result<T, E>;

const STATUS_UNAUTHORIZED: u16 = 401;
const STATUS_FORBIDDEN: u16 = 403;
const STATUS_BAD_REQUEST: u16 = 400;
const STATUS_INTERNAL: u16 = 500;

/// A serializable error for client rendering.
///
/// `status` is the HTTP status the server function reports. `chain` holds
/// every cause of an `anyhow` error so the error banner can show them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Error {
    pub message: String,
    pub chain: Vec<String>,
    pub status: u16,
}

impl Error {
    pub fn with_status(message: impl Into<String>, status: u16) -> Self {
        let message = message.into();
        Self {
            chain: vec![message.clone()],
            message,
            status,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::with_status(message, STATUS_UNAUTHORIZED)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::with_status(message, STATUS_FORBIDDEN)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_status(message, STATUS_BAD_REQUEST)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == STATUS_UNAUTHORIZED
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl From<anyhow::Error> for Error {
    fn from(error: anyhow::Error) -> Self {
        Self {
            message: error.to_string(),
            chain: error.chain().map(ToString::to_string).collect(),
            status: STATUS_INTERNAL,
        }
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::with_status(s, STATUS_INTERNAL)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::with_status(s, STATUS_INTERNAL)
    }
}

impl From<RouteError> for Error {
    fn from(error: RouteError) -> Self {
        Self::unauthorized(error.to_string())
    }
}

impl From<UploadError> for Error {
    fn from(error: UploadError) -> Self {
        Self::bad_request(error.to_string())
    }
}

impl From<crate::models::FormError> for Error {
    fn from(error: crate::models::FormError) -> Self {
        Self::bad_request(error.to_string())
    }
}

macro_rules! from_std_error {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Error {
                fn from(error: $ty) -> Self {
                    anyhow::Error::from(error).into()
                }
            }
        )*
    };
}

from_std_error!(
    serde_json::Error,
    url::ParseError,
    uuid::Error,
    jiff::Error,
);

/// Build an [`Error`] from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from($crate::internal_anyhow_dont_use!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn anyhow_chain_is_preserved() {
        let result: std::result::Result<(), anyhow::Error> =
            Err(anyhow::anyhow!("connection refused")).context("failed to reach backend");
        let error = Error::from(result.unwrap_err());

        assert_eq!(error.message, "failed to reach backend");
        assert_eq!(error.chain, vec!["failed to reach backend", "connection refused"]);
        assert_eq!(error.status, 500);
    }

    #[test]
    fn route_errors_are_unauthorized() {
        let error = Error::from(RouteError::InvalidRole("Janitor".into()));
        assert!(error.is_unauthorized());
    }

    #[test]
    fn err_macro_formats() {
        let error = crate::err!("no session for {}", "alice");
        assert_eq!(error.to_string(), "no session for alice");
    }
}
