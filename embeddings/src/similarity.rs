//! Similarity computation for embeddings.

use crate::error::{EmbeddingError, Result};

/// Compute the inner product between two embeddings.
///
/// `nomic-embed-text` vectors are unit length, so for them this is the
/// cosine similarity as well.
pub fn dot_product(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    Ok(a.iter().zip(b.iter()).map(|(x, y)| x * y).sum())
}
