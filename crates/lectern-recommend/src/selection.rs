//! Session-scoped selection and the view derived from it.

use lectern_core::Result;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::rerank::Recommender;
use crate::table::MovieTable;
use crate::types::{MovieRecord, Recommendation};

/// The single currently selected movie id.
pub struct SelectionState {
    selected: RwLock<i64>,
}

impl SelectionState {
    /// Start at the table's first row.
    pub fn new(table: &MovieTable) -> Self {
        Self {
            selected: RwLock::new(table.first().id),
        }
    }

    pub fn current(&self) -> i64 {
        *self.selected.read()
    }

    /// Overwrite the selection. Ids missing from `table` are rejected and
    /// leave the current selection in place.
    pub fn select(&self, table: &MovieTable, id: i64) -> bool {
        if table.get(id).is_none() {
            warn!("Ignoring selection of unknown movie id {}", id);
            return false;
        }
        *self.selected.write() = id;
        debug!("Selected movie {}", id);
        true
    }
}

/// Everything the UI renders for one selection.
#[derive(Debug, Clone)]
pub struct PageView {
    pub selected: MovieRecord,
    pub recommendations: Vec<Recommendation>,
}

impl PageView {
    /// Build the view for `selected`. Falls back to the first row if the id
    /// is not in the table.
    pub fn build(
        table: &MovieTable,
        recommender: &Recommender,
        selected: i64,
        n: usize,
    ) -> Result<Self> {
        let movie = table.get(selected).unwrap_or_else(|| table.first()).clone();
        let recommendations = recommender.recommend(movie.id, n)?;
        Ok(Self {
            selected: movie,
            recommendations,
        })
    }

    /// Number of pages of `page_size` cards, at least one.
    pub fn page_count(&self, page_size: usize) -> usize {
        let page_size = page_size.max(1);
        self.recommendations.len().div_ceil(page_size).max(1)
    }

    /// Cards on zero-based `page`, clamped to the last page.
    pub fn page(&self, page: usize, page_size: usize) -> &[Recommendation] {
        let page_size = page_size.max(1);
        let page = page.min(self.page_count(page_size) - 1);
        let start = (page * page_size).min(self.recommendations.len());
        let end = (start + page_size).min(self.recommendations.len());
        &self.recommendations[start..end]
    }
}
