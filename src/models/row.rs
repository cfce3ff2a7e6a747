//! Normalized registry row, one per house number range.

use serde::{Deserialize, Serialize};

use super::range::{Coordinate, Parity, RangeEntry};
use crate::error::Result;

/// One house number range of one street, as delivered by the loader.
///
/// `city` and `street` are expected in normalized form (see
/// [`crate::normalize::normalize_name`]); the registry normalizes again
/// on insertion, which is a no-op for already normalized names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryRow {
    pub min_number: u32,
    pub max_number: u32,
    pub number_type: Parity,
    pub street: String,
    pub city: String,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

impl RegistryRow {
    /// Build the range entry this row describes
    pub fn to_entry(&self) -> Result<RangeEntry> {
        RangeEntry::new(
            self.min_number,
            self.max_number,
            self.number_type,
            Coordinate::new(self.x, self.y),
        )
    }
}
