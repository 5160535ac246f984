//! Brute-force k-nearest-neighbour index over movie vectors.

use std::path::Path;

use lectern_core::{Error, Result};
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::table::MovieTable;

/// Distance used by the index.
///
/// Recommendation scores are `1 - distance`, which only reads as a
/// similarity for bounded metrics. The default is `Cosine`, under which
/// `1 - distance` is exactly the cosine similarity in `[-1, 1]`.
///
/// This differs from the squared-L2-over-unit-vectors reading of the score.
/// For unit vectors `SqEuclidean` gives `2 - 2·cos`, so `1 - distance` is
/// `2·cos - 1` and can reach `-3`. A snapshot declaring `"sqeuclidean"`
/// gets that behaviour. Scores are never renormalised. `Euclidean`
/// distances are not bounded by 1, so its scores are only a ranking proxy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    #[default]
    Cosine,
    Euclidean,
    SqEuclidean,
}

impl DistanceMetric {
    pub fn distance(&self, a: ArrayView1<f32>, b: ArrayView1<f32>) -> f64 {
        match self {
            DistanceMetric::Cosine => {
                let dot = a.dot(&b) as f64;
                // sqrt(x * x) == x, so a vector is exactly at distance 0 from itself
                let norm = (a.dot(&a) as f64 * b.dot(&b) as f64).sqrt();
                if norm < f64::EPSILON {
                    return 1.0;
                }
                (1.0 - dot / norm).max(0.0)
            }
            DistanceMetric::Euclidean => sq_euclidean(a, b).sqrt(),
            DistanceMetric::SqEuclidean => sq_euclidean(a, b),
        }
    }
}

fn sq_euclidean(a: ArrayView1<f32>, b: ArrayView1<f32>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = (*x - *y) as f64;
            d * d
        })
        .sum()
}

/// One neighbour: table row and its distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub row: usize,
    pub distance: f64,
}

/// On-disk form of a prebuilt index.
#[derive(Debug, Serialize, Deserialize)]
struct NeighborSnapshot {
    #[serde(default)]
    metric: DistanceMetric,
    vectors: Vec<Vec<f32>>,
}

pub struct NeighborIndex {
    metric: DistanceMetric,
    vectors: Array2<f32>,
}

impl NeighborIndex {
    /// Index the table's own vectors.
    pub fn fit(table: &MovieTable, metric: DistanceMetric) -> Self {
        info!("Fitted {:?} neighbour index over {} movies", metric, table.len());
        Self {
            metric,
            vectors: table.vectors(),
        }
    }

    /// Load a prebuilt index whose rows line up with `table`.
    pub fn load(path: &Path, table: &MovieTable) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Snapshot(format!("{}: {}", path.display(), e)))?;
        let snapshot: NeighborSnapshot = serde_json::from_str(&raw)
            .map_err(|e| Error::Snapshot(format!("{}: {}", path.display(), e)))?;

        if snapshot.vectors.len() != table.len() {
            return Err(Error::Snapshot(format!(
                "index has {} rows but the table has {}",
                snapshot.vectors.len(),
                table.len()
            )));
        }

        let dim = table.dimension();
        let mut flat = Vec::with_capacity(snapshot.vectors.len() * dim);
        for (row, vector) in snapshot.vectors.iter().enumerate() {
            if vector.len() != dim {
                return Err(Error::Snapshot(format!(
                    "index row {} has {} dims, expected {}",
                    row,
                    vector.len(),
                    dim
                )));
            }
            flat.extend_from_slice(vector);
        }
        let vectors = Array2::from_shape_vec((snapshot.vectors.len(), dim), flat)
            .map_err(|e| Error::Snapshot(e.to_string()))?;

        info!(
            "Loaded {:?} neighbour index ({} rows) from {}",
            snapshot.metric,
            table.len(),
            path.display()
        );
        Ok(Self {
            metric: snapshot.metric,
            vectors,
        })
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    pub fn len(&self) -> usize {
        self.vectors.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `n` rows nearest to `query`, nearest first.
    ///
    /// Ties are broken by putting `anchor` first, then by row order, so a
    /// row queried with its own vector always comes back as the first hit.
    pub fn kneighbors(
        &self,
        query: ArrayView1<f32>,
        n: usize,
        anchor: Option<usize>,
    ) -> Result<Vec<Neighbor>> {
        if query.len() != self.vectors.ncols() {
            return Err(Error::Store(format!(
                "query has {} dims, index has {}",
                query.len(),
                self.vectors.ncols()
            )));
        }

        let mut neighbors: Vec<Neighbor> = self
            .vectors
            .axis_iter(Axis(0))
            .enumerate()
            .map(|(row, vector)| Neighbor {
                row,
                distance: self.metric.distance(query, vector),
            })
            .collect();

        let is_anchor = |row: usize| anchor == Some(row);
        neighbors.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| is_anchor(b.row).cmp(&is_anchor(a.row)))
                .then_with(|| a.row.cmp(&b.row))
        });
        neighbors.truncate(n);

        debug!("kneighbors: {} of {} rows", neighbors.len(), self.len());
        Ok(neighbors)
    }
}
