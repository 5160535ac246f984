//! Movie and recommendation types.

use serde::{Deserialize, Serialize};

/// One row of the movie table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: i64,
    pub title: String,
    /// 0–10 scale.
    pub rating: f64,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub actors: Vec<String>,
    pub vector: Vec<f32>,
}

/// A recommended movie with its similarity to the selected one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub movie: MovieRecord,
    /// `1 - distance` under the index metric.
    pub similarity_score: f64,
}
