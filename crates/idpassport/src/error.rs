//! Errors for idpassport

use thiserror::Error;

/// idpassport Errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Token too large: {size} bytes (maximum: {max} bytes)")]
    TokenTooLarge { size: usize, max: usize },

    // ============================================================================
    // Format Errors
    // ============================================================================
    #[error("Invalid JWT format: expected three parts separated by '.'")]
    FormatInvalid,

    #[error("Base64URL decoding failed: {0}")]
    FormatInvalidBase64(String),

    #[error("JSON parsing failed: {0}")]
    FormatInvalidJson(String),

    #[error("Header field '{field}' too long: {length} bytes (maximum: {max} bytes)")]
    HeaderFieldTooLong {
        field: String,
        length: usize,
        max: usize,
    },

    #[error("Claims payload must be a JSON object, found {found}")]
    PayloadNotObject { found: &'static str },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),

    #[error("Error initializing the identity SDK")]
    InitializationFailed,

    // ============================================================================
    // Flow Errors
    // ============================================================================
    #[error("An authentication flow is already in progress")]
    FlowInProgress,

    #[error("Invalid response returned from authentication: no ID token")]
    IdTokenMissing,

    #[error("Invalid ID Token")]
    IdTokenInvalid,

    /// Failure reported by the vendor SDK, rendered as `code message`
    #[error("{code} {message}")]
    Sdk { code: String, message: String },
}

impl Error {
    /// Build an SDK error from the vendor's code and description
    pub fn sdk(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Sdk {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for idpassport operations
pub type Result<T> = std::result::Result<T, Error>;
