//! Lectern Store — in-memory flat L2 index over document segments.

pub mod index;
pub mod types;

pub use index::SegmentStore;
pub use types::*;
