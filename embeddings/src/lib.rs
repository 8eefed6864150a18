//! # Embeddings
//!
//! Turns user queries into dense vectors and scores vectors against each
//! other.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Embeddings                                   │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  EmbeddingProvider ──► EmbeddingResponse ──► Embedding          │
//! │       │                                         │               │
//! │       ▼                                         ▼               │
//! │  OllamaProvider                           dot_product           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod provider;
pub mod similarity;

pub use error::{EmbeddingError, Result};
pub use provider::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, OllamaProvider};
pub use similarity::dot_product;

/// A dense vector embedding.
pub type Embedding = Vec<f32>;
