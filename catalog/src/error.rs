//! Error types for catalog loading and search.

use thiserror::Error;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors that can occur while loading or searching the catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A row does not have the expected number of columns.
    #[error("line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// The id column is not an integer.
    #[error("line {line}: invalid id {value:?}")]
    InvalidId { line: usize, value: String },

    /// The vector column could not be decoded.
    #[error("line {line}: {source}")]
    InvalidVector {
        line: usize,
        #[source]
        source: VectorParseError,
    },

    /// A row has an empty vector.
    #[error("line {line}: empty vector")]
    EmptyVector { line: usize },

    /// A row vector does not match the dimension of earlier rows.
    #[error("line {line}: vector has {actual} dimensions, earlier rows have {expected}")]
    InconsistentDimension {
        line: usize,
        expected: usize,
        actual: usize,
    },

    /// A row vector does not match the query dimension.
    #[error("row {id}: dimension mismatch, expected {expected}, got {actual}")]
    DimensionMismatch {
        id: i64,
        expected: usize,
        actual: usize,
    },

    /// Scoring error.
    #[error("scoring error: {0}")]
    Embedding(#[from] openvto_embeddings::EmbeddingError),

    /// IO error.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from decoding a vector literal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VectorParseError {
    /// A token is not a number.
    #[error("invalid number {token:?} at position {position}")]
    InvalidNumber { token: String, position: usize },
}
