//! Error types for shademesh.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur while loading, saving, or shading a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh file could not be opened or read.
    #[error("cannot open mesh file {}: {source}", path.display())]
    FileNotFound {
        /// The file path.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The mesh file is not valid binary STL.
    #[error("malformed mesh {}: {source}", path.display())]
    MalformedMesh {
        /// The file path.
        path: PathBuf,
        /// What was wrong with the byte layout.
        #[source]
        source: FormatError,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}

/// Byte-layout violations found while decoding binary STL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The buffer ends before the 80-byte header and facet count.
    #[error("header truncated: need {expected} bytes, got {actual}")]
    HeaderTruncated {
        /// Bytes required for header plus facet count.
        expected: usize,
        /// Bytes available.
        actual: usize,
    },

    /// The declared facet count disagrees with the buffer length.
    #[error("{declared} facets declare {expected} bytes, file has {actual}")]
    LengthMismatch {
        /// Facet count stored in the header.
        declared: u32,
        /// Byte length implied by the facet count.
        expected: u64,
        /// Actual byte length.
        actual: u64,
    },

    /// More facets than corner indices can address.
    #[error("{declared} facets exceed the supported maximum of {max}")]
    TooManyFacets {
        /// Facet count stored in the header.
        declared: u32,
        /// Largest supported facet count.
        max: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message_names_path() {
        let err = MeshError::MalformedMesh {
            path: PathBuf::from("sphere.stl"),
            source: FormatError::LengthMismatch {
                declared: 2,
                expected: 184,
                actual: 134,
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("sphere.stl"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_invalid_param() {
        let err = MeshError::invalid_param("tolerance", -1.0, "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid parameter: tolerance = -1 (must be positive)"
        );
    }
}
