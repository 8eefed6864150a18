//! # Retrieval
//!
//! Finds garments for a natural-language query. The query is embedded once
//! and then searched either in the local catalog snapshot or in a Couchbase
//! vector index.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Search Engine                                │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                      query text                                 │
//! │                          │                                      │
//! │                          ▼                                      │
//! │                  EmbeddingProvider                              │
//! │                          │                                      │
//! │             ┌────────────┴────────────┐                         │
//! │             ▼                         ▼                         │
//! │      ┌──────────────┐         ┌──────────────┐                  │
//! │      │   Catalog    │         │  Couchbase   │                  │
//! │      │   top-k      │         │  knn query   │                  │
//! │      └──────────────┘         └──────────────┘                  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use openvto_retrieval::SearchEngine;
//!
//! let engine = SearchEngine::new(Arc::new(OllamaProvider::new()))
//!     .with_catalog(Arc::new(catalog));
//!
//! let hits = engine.local_search("blue denim jacket", 5).await?;
//! ```

pub mod config;
pub mod couchbase;
pub mod engine;
pub mod error;

pub use config::CouchbaseConfig;
pub use couchbase::{CouchbaseClient, CouchbaseHit, CouchbaseSearchResponse, KnnQuery, VectorSearchRequest};
pub use engine::SearchEngine;
pub use error::{Result, RetrievalError};
