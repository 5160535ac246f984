//! Lectern Recommend — item-to-item movie recommendations.
//!
//! A static `MovieTable` is indexed by a brute-force `NeighborIndex`.
//! `Recommender` asks the index for one neighbour more than requested,
//! drops the item itself and reranks the rest by similarity boosted with
//! the movie's rating.

pub mod neighbors;
pub mod rerank;
pub mod selection;
pub mod table;
pub mod types;

pub use neighbors::{DistanceMetric, Neighbor, NeighborIndex};
pub use rerank::{boosted_score, Recommender, DEFAULT_RATING_WEIGHT};
pub use selection::{PageView, SelectionState};
pub use table::MovieTable;
pub use types::*;
