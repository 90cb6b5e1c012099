//! Error types for Cairn.
//!
//! Provides structured errors with:
//! - Unique error codes for host-facing reporting
//! - Source error chaining
//! - Client vs server error categorization

use std::io;
use thiserror::Error;

/// Result type for Cairn operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error codes for host-facing reporting.
///
/// Codes are structured as:
/// - 1xxx: Validation errors (client)
/// - 5xxx: Storage errors (server)
/// - 6xxx: Internal errors (server)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Validation errors (1xxx)
    PositionOutOfRange = 1001,
    NonLeafProofRequest = 1002,
    MalformedProof = 1003,
    BitLengthOverflow = 1004,

    // Storage errors (5xxx)
    StorageRead = 5001,
    StorageWrite = 5002,

    // Internal errors (6xxx)
    Internal = 6001,
}

impl ErrorCode {
    /// Get the numeric code.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Check if this is a client error (caller passed bad input).
    pub fn is_client_error(self) -> bool {
        (1000..5000).contains(&self.code())
    }

    /// Check if this is a server error (the accumulator or its storage failed).
    pub fn is_server_error(self) -> bool {
        self.code() >= 5000
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Errors that can occur in Cairn.
#[derive(Debug, Error)]
pub enum Error {
    /// A position outside `[1, size]` was passed to an operation that
    /// requires a live node.
    #[error("[{code}] position out of range: {message}")]
    PositionOutOfRange { code: ErrorCode, message: String },

    /// A proof was requested for a position that is not a leaf.
    #[error("[{code}] proof requested for non-leaf: {message}")]
    NonLeafProofRequest { code: ErrorCode, message: String },

    /// A proof's structure is inconsistent with its own position and size.
    #[error("[{code}] malformed proof: {message}")]
    MalformedProof { code: ErrorCode, message: String },

    /// A bit-utility was asked for more than 64 bits.
    #[error("[{code}] bit length overflow: {message}")]
    BitLengthOverflow { code: ErrorCode, message: String },

    /// Node storage failed.
    #[error("[{code}] storage error: {message}")]
    Storage {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal invariant violation.
    #[error("[{code}] internal error: {message}")]
    Internal { code: ErrorCode, message: String },
}

impl Error {
    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::PositionOutOfRange { code, .. } => *code,
            Error::NonLeafProofRequest { code, .. } => *code,
            Error::MalformedProof { code, .. } => *code,
            Error::BitLengthOverflow { code, .. } => *code,
            Error::Storage { code, .. } => *code,
            Error::Internal { code, .. } => *code,
        }
    }

    /// Check if this is a client error.
    pub fn is_client_error(&self) -> bool {
        self.code().is_client_error()
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        self.code().is_server_error()
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl Error {
    /// Create a PositionOutOfRange error.
    pub fn position_out_of_range(message: impl Into<String>) -> Self {
        Error::PositionOutOfRange {
            code: ErrorCode::PositionOutOfRange,
            message: message.into(),
        }
    }

    /// Create a NonLeafProofRequest error.
    pub fn non_leaf_proof_request(message: impl Into<String>) -> Self {
        Error::NonLeafProofRequest {
            code: ErrorCode::NonLeafProofRequest,
            message: message.into(),
        }
    }

    /// Create a MalformedProof error.
    pub fn malformed_proof(message: impl Into<String>) -> Self {
        Error::MalformedProof {
            code: ErrorCode::MalformedProof,
            message: message.into(),
        }
    }

    /// Create a BitLengthOverflow error.
    pub fn bit_length_overflow(message: impl Into<String>) -> Self {
        Error::BitLengthOverflow {
            code: ErrorCode::BitLengthOverflow,
            message: message.into(),
        }
    }

    /// Create a Storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Error::Storage {
            code: ErrorCode::StorageRead,
            message: message.into(),
            source: None,
        }
    }

    /// Create an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal {
            code: ErrorCode::Internal,
            message: message.into(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Storage {
            code: ErrorCode::StorageRead,
            message: e.to_string(),
            source: Some(Box::new(e)),
        }
    }
}
