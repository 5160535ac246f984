//! Static movie table loaded from a JSON snapshot.

use std::collections::HashMap;
use std::path::Path;

use lectern_core::{Error, Result};
use ndarray::Array2;
use tracing::info;

use crate::types::MovieRecord;

/// Immutable movie table with id lookup.
#[derive(Debug, Clone)]
pub struct MovieTable {
    rows: Vec<MovieRecord>,
    by_id: HashMap<i64, usize>,
    dim: usize,
}

impl MovieTable {
    /// Load a JSON array of movie records.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Snapshot(format!("{}: {}", path.display(), e)))?;
        let rows: Vec<MovieRecord> = serde_json::from_str(&raw)
            .map_err(|e| Error::Snapshot(format!("{}: {}", path.display(), e)))?;
        let table = Self::from_rows(rows)?;
        info!(
            "Loaded {} movies (dim={}) from {}",
            table.len(),
            table.dim,
            path.display()
        );
        Ok(table)
    }

    /// Build a table from rows. Rows must be non-empty, have unique ids and
    /// share one finite, non-empty vector dimension.
    pub fn from_rows(rows: Vec<MovieRecord>) -> Result<Self> {
        let dim = match rows.first() {
            Some(first) => first.vector.len(),
            None => return Err(Error::Snapshot("movie table is empty".into())),
        };
        if dim == 0 {
            return Err(Error::Snapshot("movie vectors are empty".into()));
        }

        let mut by_id = HashMap::with_capacity(rows.len());
        for (row, movie) in rows.iter().enumerate() {
            if movie.vector.len() != dim {
                return Err(Error::Snapshot(format!(
                    "movie {} has a {}-dim vector, expected {}",
                    movie.id,
                    movie.vector.len(),
                    dim
                )));
            }
            if movie.vector.iter().any(|x| !x.is_finite()) {
                return Err(Error::Snapshot(format!(
                    "movie {} has a non-finite vector",
                    movie.id
                )));
            }
            if let Some(first) = by_id.insert(movie.id, row) {
                return Err(Error::Snapshot(format!(
                    "movie id {} appears at rows {} and {}",
                    movie.id, first, row
                )));
            }
        }

        Ok(Self { rows, by_id, dim })
    }

    pub fn get(&self, id: i64) -> Option<&MovieRecord> {
        self.position(id).map(|row| &self.rows[row])
    }

    /// Row index of the movie with `id`.
    pub fn position(&self, id: i64) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    pub fn row(&self, row: usize) -> Option<&MovieRecord> {
        self.rows.get(row)
    }

    pub fn first(&self) -> &MovieRecord {
        // from_rows rejects empty tables
        &self.rows[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &MovieRecord> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// All vectors as a `(rows, dim)` matrix in row order.
    pub fn vectors(&self) -> Array2<f32> {
        let mut matrix = Array2::<f32>::zeros((self.rows.len(), self.dim));
        for (mut out, movie) in matrix.rows_mut().into_iter().zip(&self.rows) {
            for (slot, value) in out.iter_mut().zip(&movie.vector) {
                *slot = *value;
            }
        }
        matrix
    }
}
