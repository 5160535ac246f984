//! Rating-boosted rerank of nearest neighbours.

use std::sync::Arc;

use lectern_core::Result;
use ndarray::ArrayView1;
use tracing::debug;

use crate::neighbors::NeighborIndex;
use crate::table::MovieTable;
use crate::types::Recommendation;

pub const DEFAULT_RATING_WEIGHT: f64 = 0.2;

/// Similarity boosted by the rating normalised to `[0, 1]`.
pub fn boosted_score(similarity: f64, rating: f64, rating_weight: f64) -> f64 {
    similarity * (1.0 + rating_weight * (rating / 10.0))
}

/// Item-to-item recommender over a table and its neighbour index.
pub struct Recommender {
    table: Arc<MovieTable>,
    index: Arc<NeighborIndex>,
    rating_weight: f64,
}

impl Recommender {
    pub fn new(table: Arc<MovieTable>, index: Arc<NeighborIndex>) -> Self {
        Self {
            table,
            index,
            rating_weight: DEFAULT_RATING_WEIGHT,
        }
    }

    pub fn with_rating_weight(mut self, rating_weight: f64) -> Self {
        self.rating_weight = rating_weight;
        self
    }

    /// Up to `n` movies similar to `id`, best boosted score first.
    ///
    /// An id that is not in the table yields no recommendations.
    pub fn recommend(&self, id: i64, n: usize) -> Result<Vec<Recommendation>> {
        let (Some(row), Some(movie)) = (self.table.position(id), self.table.get(id)) else {
            debug!("recommend: unknown movie id {}", id);
            return Ok(Vec::new());
        };

        // The movie itself is always the nearest hit; ask for one extra and drop it
        let query = ArrayView1::from(movie.vector.as_slice());
        let neighbors = self.index.kneighbors(query, n + 1, Some(row))?;

        let mut scored: Vec<(Recommendation, f64)> = neighbors
            .into_iter()
            .skip(1)
            .filter_map(|neighbor| {
                let candidate = self.table.row(neighbor.row)?;
                let similarity_score = 1.0 - neighbor.distance;
                let boosted = boosted_score(similarity_score, candidate.rating, self.rating_weight);
                Some((
                    Recommendation {
                        movie: candidate.clone(),
                        similarity_score,
                    },
                    boosted,
                ))
            })
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        debug!("recommend: {} results for movie {}", scored.len(), id);
        Ok(scored.into_iter().map(|(rec, _)| rec).collect())
    }
}
