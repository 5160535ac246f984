//! Exact nearest-neighbour store for document segments.
//!
//! Vectors live in one dense `(N, dim)` matrix whose row `i` belongs to
//! `ids[i]`; the docstore maps ids to segments. Both are only mutated
//! together under the write lock, so a reader never sees a row without
//! its segment.

use std::collections::{HashMap, HashSet};

use lectern_core::{Error, Result};
use ndarray::{Array1, Array2};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::types::{ScoredSegment, Segment};

/// In-memory similarity store. Contents are lost when the process exits.
pub struct SegmentStore {
    dim: usize,
    inner: RwLock<StoreInner>,
}

struct StoreInner {
    vectors: Array2<f32>,
    ids: Vec<String>,
    docstore: HashMap<String, Segment>,
}

impl SegmentStore {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            inner: RwLock::new(StoreInner {
                vectors: Array2::zeros((0, dim)),
                ids: Vec::new(),
                docstore: HashMap::new(),
            }),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// Insert segments with their embeddings as one batch.
    ///
    /// The whole batch is validated first (dimensions, finite values,
    /// id uniqueness against the batch and the store); a rejected batch
    /// leaves the store untouched.
    pub fn add(&self, entries: Vec<(Segment, Array1<f32>)>) -> Result<Vec<String>> {
        for (segment, vector) in &entries {
            if vector.len() != self.dim {
                return Err(Error::Store(format!(
                    "segment {} has dim {}, store expects {}",
                    segment.id,
                    vector.len(),
                    self.dim
                )));
            }
            if vector.iter().any(|x| !x.is_finite()) {
                return Err(Error::Store(format!("segment {} has non-finite values", segment.id)));
            }
        }

        let mut inner = self.inner.write();

        let mut batch_ids = HashSet::with_capacity(entries.len());
        for (segment, _) in &entries {
            if inner.docstore.contains_key(&segment.id) || !batch_ids.insert(segment.id.as_str()) {
                return Err(Error::Store(format!("duplicate segment id {}", segment.id)));
            }
        }

        let mut added = Vec::with_capacity(entries.len());
        for (segment, vector) in entries {
            inner
                .vectors
                .push_row(vector.view())
                .map_err(|e| Error::Store(e.to_string()))?;
            inner.ids.push(segment.id.clone());
            added.push(segment.id.clone());
            inner.docstore.insert(segment.id.clone(), segment);
        }

        info!("Stored {} segments (total {})", added.len(), inner.ids.len());
        Ok(added)
    }

    /// Return the `k` segments nearest to `query` by squared L2 distance,
    /// closest first. Equal distances keep insertion order.
    pub fn search(&self, query: &Array1<f32>, k: usize) -> Result<Vec<ScoredSegment>> {
        if query.len() != self.dim {
            return Err(Error::Store(format!(
                "query has dim {}, store expects {}",
                query.len(),
                self.dim
            )));
        }

        let inner = self.inner.read();
        if k == 0 || inner.ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, f32)> = inner
            .vectors
            .rows()
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                let dist = row
                    .iter()
                    .zip(query.iter())
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum::<f32>();
                (i, dist)
            })
            .collect();
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(k);

        let hits: Vec<ScoredSegment> = scored
            .into_iter()
            .filter_map(|(i, distance)| {
                inner.docstore.get(&inner.ids[i]).map(|segment| ScoredSegment {
                    segment: segment.clone(),
                    distance,
                })
            })
            .collect();

        debug!("Search returned {} of {} segments", hits.len(), inner.ids.len());
        Ok(hits)
    }

    pub fn get(&self, id: &str) -> Option<Segment> {
        self.inner.read().docstore.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
