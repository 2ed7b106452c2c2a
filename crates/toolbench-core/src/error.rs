//! Error handling for Toolbench
//!
//! Provides error types for the layers below the user interface:
//! - Tool errors (shapes, parameters, lookups)
//! - Library errors (tool number assignment)
//! - Serializer errors (reading and writing tool files)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Tool error type
///
/// Represents errors related to the tool model itself.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    /// Shape name does not match any built-in shape
    #[error("Unknown tool shape: {name}")]
    UnknownShape {
        /// The shape name that could not be resolved.
        name: String,
    },

    /// Shape does not carry the requested parameter
    #[error("Shape '{shape}' has no parameter '{param}'")]
    UnknownParameter {
        /// The shape name.
        shape: String,
        /// The parameter name.
        param: String,
    },

    /// Parameter value could not be parsed or has the wrong type
    #[error("Invalid value '{value}' for parameter '{param}': {reason}")]
    InvalidParameter {
        /// The parameter name.
        param: String,
        /// The offending value as entered.
        value: String,
        /// The reason the value was rejected.
        reason: String,
    },

    /// Tool not found in the database
    #[error("Tool {id} not found")]
    ToolNotFound {
        /// The id of the missing tool.
        id: String,
    },

    /// Operation needs feeds and speeds support the tool does not have
    #[error("Tool '{label}' does not support feeds and speeds")]
    FeedsNotSupported {
        /// The tool label.
        label: String,
    },
}

/// Library error type
///
/// Represents errors related to tool libraries and tool number slots.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LibraryError {
    /// Library not found
    #[error("Library {id} not found")]
    LibraryNotFound {
        /// The id of the missing library.
        id: String,
    },

    /// Tool number already taken in the library
    #[error("Tool number {tool_no} already used in library '{library}'")]
    DuplicateToolNumber {
        /// The library label.
        library: String,
        /// The conflicting tool number.
        tool_no: u32,
    },
}

/// Serializer error type
///
/// Represents errors raised while reading or writing tool storage.
#[derive(Error, Debug)]
pub enum SerializerError {
    /// Standard I/O error
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path that was being accessed.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding or decoding error
    #[error("JSON error in {path}: {source}")]
    Json {
        /// Path that was being decoded or encoded.
        path: String,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// Well-formed JSON with unexpected content
    #[error("Malformed document {path}: {reason}")]
    Malformed {
        /// Path of the document.
        path: String,
        /// What was wrong with it.
        reason: String,
    },
}

/// Main error type for Toolbench
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Tool error
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Library error
    #[error(transparent)]
    Library(#[from] LibraryError),

    /// Serializer error
    #[error(transparent)]
    Serializer(#[from] SerializerError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this error reports a missing tool or library
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::Tool(ToolError::ToolNotFound { .. })
                | Error::Library(LibraryError::LibraryNotFound { .. })
        )
    }

    /// Check if this is a serializer error
    pub fn is_serializer_error(&self) -> bool {
        matches!(self, Error::Serializer(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
