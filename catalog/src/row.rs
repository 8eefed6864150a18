//! Catalog row types.

use serde::{Deserialize, Serialize};

use openvto_embeddings::Embedding;

/// One garment in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRow {
    /// Image file name.
    pub filename: String,

    /// Public link to the garment image.
    pub link: String,

    /// Numeric identifier.
    pub id: i64,

    /// Free-text garment description.
    pub description: String,

    /// Model that produced `vector`.
    pub embedding_model: String,

    /// The description embedding.
    pub vector: Embedding,
}

impl CatalogRow {
    /// Pair this row with a similarity score.
    pub fn scored(self, score: f32) -> ScoredRow {
        ScoredRow { row: self, score }
    }
}

/// A catalog row together with its similarity to one query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRow {
    /// The matched row.
    pub row: CatalogRow,

    /// Inner product with the query vector.
    pub score: f32,
}

impl ScoredRow {
    /// One-line summary meant to be read by a language model.
    pub fn summary(&self) -> String {
        format!(
            "ID: {}, File: {}, Score: {:.4}, Desc: {}, Link: {}",
            self.row.id, self.row.filename, self.score, self.row.description, self.row.link
        )
    }

    /// The serialisable view of this result.
    pub fn to_hit(&self) -> SearchHit {
        SearchHit {
            id: self.row.id,
            filename: self.row.filename.clone(),
            link: self.row.link.clone(),
            description: self.row.description.clone(),
            embedding_model: self.row.embedding_model.clone(),
            score: self.score,
        }
    }
}

/// A search result without the raw vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: i64,
    pub filename: String,
    pub link: String,
    pub description: String,
    pub embedding_model: String,
    pub score: f32,
}
