//! Error types for telegram decoding

use thiserror::Error;

/// Result type for telegram decoding operations
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Coarse classification of a [`DecodeError`]
///
/// Callers that only need to decide whether to skip, reject or abort can
/// match on this instead of on the individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No schema is registered for the port
    UnsupportedPort,
    /// The payload does not fit the schema of its port
    MalformedPayload,
    /// A schema itself is broken
    SchemaDefinition,
}

/// Error types encountered while decoding telegrams or registering schemas
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// No schema is registered for this port number
    #[error("Unsupported port: {0}")]
    UnsupportedPort(u32),

    /// Payload length differs from the size declared by the port schema
    #[error("Malformed payload: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Payload string is not valid hexadecimal
    #[error("Malformed payload: invalid hex: {0}")]
    InvalidHex(String),

    /// A schema violates its own size or addressing rules
    #[error("Schema definition error: {0}")]
    SchemaDefinition(String),
}

impl DecodeError {
    /// Create a new LengthMismatch error
    pub fn length_mismatch(expected: usize, actual: usize) -> Self {
        DecodeError::LengthMismatch { expected, actual }
    }

    /// Create a new InvalidHex error
    pub fn invalid_hex(msg: impl Into<String>) -> Self {
        DecodeError::InvalidHex(msg.into())
    }

    /// Create a new SchemaDefinition error
    pub fn schema_definition(msg: impl Into<String>) -> Self {
        DecodeError::SchemaDefinition(msg.into())
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::UnsupportedPort(_) => ErrorKind::UnsupportedPort,
            DecodeError::LengthMismatch { .. } | DecodeError::InvalidHex(_) => {
                ErrorKind::MalformedPayload
            }
            DecodeError::SchemaDefinition(_) => ErrorKind::SchemaDefinition,
        }
    }

    /// Check if no schema is registered for the port
    pub fn is_unsupported_port(&self) -> bool {
        self.kind() == ErrorKind::UnsupportedPort
    }

    /// Check if the payload does not fit its port's schema
    pub fn is_malformed_payload(&self) -> bool {
        self.kind() == ErrorKind::MalformedPayload
    }
}

impl From<hex::FromHexError> for DecodeError {
    fn from(err: hex::FromHexError) -> Self {
        DecodeError::invalid_hex(err.to_string())
    }
}
