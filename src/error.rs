//! Error types for matrix operations and clustering

use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during matrix operations or clustering
#[derive(Error, Debug)]
pub enum Error {
    /// Dimension mismatch between operands, or an operation that requires a
    /// different shape (square, non-empty, ...)
    #[error("shape mismatch: {message}")]
    Shape {
        /// Error message
        message: String,
    },

    /// Row or column access outside the matrix bounds
    #[error("index out of bounds: {message}")]
    Index {
        /// Error message
        message: String,
    },

    /// Slice bounds outside the matrix, or inverted
    #[error("invalid range: {message}")]
    Range {
        /// Error message
        message: String,
    },

    /// A text cell could not be parsed as a number
    #[error("parse failure: {message}")]
    Parse {
        /// Error message
        message: String,
    },

    /// Input outside the domain of a mathematical function
    #[error("domain error: {message}")]
    Domain {
        /// Error message
        message: String,
    },

    /// The matrix is singular at inversion time
    #[error("singular matrix: determinant {determinant} is within tolerance of zero")]
    Singular {
        /// The computed determinant value
        determinant: f64,
    },

    /// A cluster lost all of its members during a centroid update
    #[error("cluster {cluster} has no assigned points")]
    EmptyCluster {
        /// Index of the empty cluster
        cluster: usize,
    },

    /// Prediction or scoring was requested before a successful fit
    #[error("fit the model before predicting or scoring")]
    NotFitted,

    /// Malformed configuration value
    #[error("invalid parameter: {message}")]
    InvalidParameter {
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create a new Shape error
    pub fn shape(message: impl Into<String>) -> Self {
        Self::Shape {
            message: message.into(),
        }
    }

    /// Create a new Index error
    pub fn index(message: impl Into<String>) -> Self {
        Self::Index {
            message: message.into(),
        }
    }

    /// Create a new Range error
    pub fn range(message: impl Into<String>) -> Self {
        Self::Range {
            message: message.into(),
        }
    }

    /// Create a new Parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new Domain error
    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain {
            message: message.into(),
        }
    }

    /// Create a new Singular error carrying the offending determinant
    pub fn singular(determinant: f64) -> Self {
        Self::Singular { determinant }
    }

    /// Create a new EmptyCluster error for the given cluster index
    pub fn empty_cluster(cluster: usize) -> Self {
        Self::EmptyCluster { cluster }
    }

    /// Create a new InvalidParameter error
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }
}
