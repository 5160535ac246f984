//! Data types for stored segments and search results.

use serde::{Deserialize, Serialize};

/// A contiguous span of extracted document text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// UUID v4, unique within the store.
    pub id: String,
    pub text: String,
    /// Display name the document was uploaded under.
    pub filename: String,
    /// Zero-based page index within the source document.
    pub page: u32,
}

impl Segment {
    /// Build a segment with a fresh random id.
    pub fn new(text: impl Into<String>, filename: impl Into<String>, page: u32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            filename: filename.into(),
            page,
        }
    }

    /// 1-indexed page number as shown to readers.
    pub fn page_no(&self) -> u32 {
        self.page + 1
    }
}

/// A search hit: the stored segment and its squared L2 distance to the query.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredSegment {
    pub segment: Segment,
    pub distance: f32,
}
