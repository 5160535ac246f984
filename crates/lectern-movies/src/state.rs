//! Shared application state.

use std::sync::Arc;

use lectern_core::{RecommendConfig, Result};
use lectern_recommend::{DistanceMetric, MovieTable, NeighborIndex, Recommender, SelectionState};
use tracing::info;

pub struct AppState {
    pub config: RecommendConfig,
    pub table: Arc<MovieTable>,
    pub recommender: Recommender,
    pub selection: SelectionState,
}

impl AppState {
    pub fn new(config: RecommendConfig, table: Arc<MovieTable>, index: NeighborIndex) -> Self {
        let recommender = Recommender::new(table.clone(), Arc::new(index))
            .with_rating_weight(config.rating_weight);
        let selection = SelectionState::new(&table);
        Self {
            config,
            table,
            recommender,
            selection,
        }
    }

    /// Load the movie table and its neighbour index from the data directory.
    /// Without an index snapshot the index is fitted on the table's vectors.
    pub fn load(config: RecommendConfig) -> Result<Self> {
        let paths = &config.data_paths;
        let table = Arc::new(MovieTable::load(&paths.movies_file)?);

        let index = if paths.neighbors_file.exists() {
            NeighborIndex::load(&paths.neighbors_file, &table)?
        } else {
            info!(
                "No index snapshot at {}; fitting on the table",
                paths.neighbors_file.display()
            );
            NeighborIndex::fit(&table, DistanceMetric::default())
        };

        Ok(Self::new(config, table, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_core::Error;

    const MOVIES: &str = r#"[
        {"id": 1, "title": "Alien", "rating": 8.5, "vector": [1.0, 0.0]},
        {"id": 2, "title": "Aliens", "rating": 8.4, "vector": [0.9, 0.1]},
        {"id": 3, "title": "Amelie", "rating": 8.3, "vector": [0.0, 1.0]}
    ]"#;

    #[test]
    fn test_load_fits_index_without_snapshot() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("movies.json"), MOVIES).unwrap();

        let state = AppState::load(RecommendConfig::from_env(dir.path()).unwrap()).unwrap();
        assert_eq!(state.selection.current(), 1);
        assert_eq!(state.recommender.recommend(1, 1).unwrap()[0].movie.id, 2);
    }

    #[test]
    fn test_load_uses_snapshot() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("movies.json"), MOVIES).unwrap();
        // The snapshot places Amelie next to Alien
        std::fs::write(
            dir.path().join("neighbors.json"),
            r#"{"metric": "euclidean", "vectors": [[0.0, 0.0], [5.0, 5.0], [0.1, 0.0]]}"#,
        )
        .unwrap();

        let state = AppState::load(RecommendConfig::from_env(dir.path()).unwrap()).unwrap();
        let recs = state.recommender.recommend(1, 2).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].movie.id, 3);
    }

    #[test]
    fn test_load_fails_on_bad_data() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = RecommendConfig::from_env(dir.path()).unwrap();
        assert!(matches!(AppState::load(config.clone()), Err(Error::Snapshot(_))));

        std::fs::write(dir.path().join("movies.json"), MOVIES).unwrap();
        std::fs::write(dir.path().join("neighbors.json"), r#"{"vectors": [[1.0, 0.0]]}"#).unwrap();
        assert!(matches!(AppState::load(config), Err(Error::Snapshot(_))));
    }
}
