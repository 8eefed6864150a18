//! # Catalog
//!
//! A garment catalog stored as a delimited text file, one row per item with
//! its embedding vector inlined, and the nearest-neighbour search run over it.
//!
//! ```text
//! filename,link,id,description,embedding_model,vector
//! 0001.jpg,https://…/0001.jpg,1,"Blue denim jacket, cropped",nomic-embed-text,"[0.01, -0.2, …]"
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use openvto_catalog::{Catalog, LoadOptions};
//!
//! let catalog = Catalog::from_path("full_data_3k.csv", &LoadOptions::default())?;
//! let hits = catalog.top_k(&query_vector, 5)?;
//! ```

pub mod error;
pub mod loader;
pub mod parser;
pub mod row;
pub mod search;
pub mod vector;

pub use error::{CatalogError, Result, VectorParseError};
pub use loader::{Catalog, LoadOptions};
pub use parser::LineParser;
pub use row::{CatalogRow, ScoredRow, SearchHit};
pub use search::top_k;
pub use vector::{format_vector, parse_vector};

/// Number of columns a catalog row must have.
pub const COLUMN_COUNT: usize = 6;
