//! Vector literal codec.
//!
//! Vectors are stored inline as `[0.1, -0.2, 0.3]`.

use openvto_embeddings::Embedding;

use crate::error::VectorParseError;

/// Decode a bracketed, comma separated vector literal.
///
/// Brackets anywhere in the input are ignored and both commas and
/// whitespace separate values, so `" [1, 2 ,3] "` and `"1 2 3"` decode the
/// same. `"[]"` decodes to an empty vector.
pub fn parse_vector(literal: &str) -> Result<Embedding, VectorParseError> {
    literal
        .split(|c: char| c == ',' || c == '[' || c == ']' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .enumerate()
        .map(|(position, token)| {
            token
                .parse::<f32>()
                .map_err(|_| VectorParseError::InvalidNumber {
                    token: token.to_string(),
                    position,
                })
        })
        .collect()
}

/// Encode a vector as a literal that [`parse_vector`] reads back exactly.
pub fn format_vector(vector: &[f32]) -> String {
    let values: Vec<String> = vector.iter().map(f32::to_string).collect();
    format!("[{}]", values.join(", "))
}
