//! Top-k inner-product search.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use tracing::debug;

use openvto_embeddings::dot_product;

use crate::error::{CatalogError, Result};
use crate::row::{CatalogRow, ScoredRow};

/// Find the `k` rows whose vectors have the largest inner product with
/// `query`.
///
/// Results are in non-increasing score order; rows with equal scores keep
/// their file order. A `k` larger than the number of rows returns every row.
pub fn top_k(rows: &[CatalogRow], query: &[f32], k: usize) -> Result<Vec<ScoredRow>> {
    let mut scores: Vec<(usize, OrderedFloat<f32>)> = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        if row.vector.len() != query.len() {
            return Err(CatalogError::DimensionMismatch {
                id: row.id,
                expected: query.len(),
                actual: row.vector.len(),
            });
        }
        let score = dot_product(query, &row.vector)?;
        scores.push((index, OrderedFloat(score)));
    }

    // Stable sort, descending
    scores.sort_by_key(|&(_, score)| Reverse(score));

    let k = k.min(scores.len());
    debug!("Selected top {k} of {} rows", rows.len());

    Ok(scores
        .into_iter()
        .take(k)
        .map(|(index, score)| rows[index].clone().scored(score.0))
        .collect())
}
