//! Error types for the counter thing.
//!
//! Errors are grouped by cause rather than by where they surface. The
//! [`Result`] alias is used throughout the crate.
//!
//! # Error Categories
//!
//! | Category | Variants | Touches state |
//! |----------|----------|---------------|
//! | Routing | `NotFound`, `MethodNotAllowed` | No |
//! | Negotiation | `NotAcceptable`, `UnsupportedMediaType`, `UnknownRepresentation` | No |
//! | Payload | `BadRequest`, `ObservationRequired` | No |
//! | Codec | `Json`, `Cbor` | No |
//! | Description | `Description`, `Template` | No |
//! | Configuration | `Config`, `Io` | No |
//!
//! # Examples
//!
//! ```
//! use counter_thing::{ThingError, ThingStatus};
//!
//! let err = ThingError::NotAcceptable("text/html".into());
//! assert_eq!(err.status(), ThingStatus::NotAcceptable);
//! assert!(err.is_client_error());
//! ```

use crate::core::types::ThingStatus;
use std::io;
use thiserror::Error;

/// Result type for counter thing operations.
pub type Result<T> = std::result::Result<T, ThingError>;

/// Errors that can occur while describing or serving the thing.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ThingError {
    /// The resource name or sub-path does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The path exists but does not accept the request method.
    #[error("Method {method} not allowed on {path}")]
    MethodNotAllowed { method: String, path: String },

    /// The requested response representation is not registered.
    #[error("Not acceptable: {0}")]
    NotAcceptable(String),

    /// The request body representation is not registered.
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// A representation token was looked up that the registry does not know.
    #[error("Unknown representation: {0}")]
    UnknownRepresentation(String),

    /// The operand is missing, malformed or out of range.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The affordance can only be read with observation requested.
    #[error("Observation required for {0}")]
    ObservationRequired(String),

    /// JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CBOR serialization or deserialization error.
    #[error("CBOR error: {0}")]
    Cbor(String),

    /// The description skeleton is malformed.
    #[error("Description error: {0}")]
    Description(String),

    /// Template substitution failed.
    #[error("Template error: {0}")]
    Template(String),

    /// Invalid server configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or socket I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ThingError {
    /// Protocol-neutral status this error is reported with.
    #[must_use]
    pub fn status(&self) -> ThingStatus {
        match self {
            ThingError::NotFound(_) => ThingStatus::NotFound,
            ThingError::MethodNotAllowed { .. } => ThingStatus::MethodNotAllowed,
            ThingError::NotAcceptable(_) => ThingStatus::NotAcceptable,
            ThingError::UnsupportedMediaType(_) => ThingStatus::UnsupportedMediaType,
            ThingError::BadRequest(_) => ThingStatus::BadRequest,
            ThingError::ObservationRequired(_) => ThingStatus::ObservationRequired,
            ThingError::UnknownRepresentation(_)
            | ThingError::Json(_)
            | ThingError::Cbor(_)
            | ThingError::Description(_)
            | ThingError::Template(_)
            | ThingError::Config(_)
            | ThingError::Io(_) => ThingStatus::Internal,
        }
    }

    /// Returns `true` when the requester caused the failure.
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }

    pub(crate) fn method_not_allowed(method: &http::Method, path: &str) -> Self {
        ThingError::MethodNotAllowed {
            method: method.to_string(),
            path: path.to_string(),
        }
    }
}

impl<T: std::fmt::Debug> From<ciborium::de::Error<T>> for ThingError {
    fn from(err: ciborium::de::Error<T>) -> Self {
        ThingError::Cbor(format!("{:?}", err))
    }
}

impl<T: std::fmt::Debug> From<ciborium::ser::Error<T>> for ThingError {
    fn from(err: ciborium::ser::Error<T>) -> Self {
        ThingError::Cbor(format!("{:?}", err))
    }
}
