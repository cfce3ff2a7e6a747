//! House number ranges of a single street.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::matcher::{Diagnostic, ErrorLog};
use crate::models::{Coordinate, Parity, RangeEntry};

/// Parity mode of a whole street
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParityMode {
    Even,
    Odd,
    Mixed,
    /// Ranges of different parity classes
    Multi,
}

impl From<Parity> for ParityMode {
    fn from(parity: Parity) -> Self {
        match parity {
            Parity::Even => ParityMode::Even,
            Parity::Odd => ParityMode::Odd,
            Parity::Mixed => ParityMode::Mixed,
        }
    }
}

/// Ranges of one street, kept sorted by lower bound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreetIndex {
    name: String,
    entries: Vec<RangeEntry>,
    max: u32,
    parity_mode: Option<ParityMode>,
}

impl StreetIndex {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            max: 0,
            parity_mode: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[RangeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lowest house number on the street
    pub fn min(&self) -> Option<u32> {
        self.entries.first().map(RangeEntry::min)
    }

    /// Highest house number on the street
    pub fn max(&self) -> Option<u32> {
        (!self.entries.is_empty()).then_some(self.max)
    }

    pub fn parity_mode(&self) -> Option<ParityMode> {
        self.parity_mode
    }

    /// Insert a range, keeping the order by lower bound (equal bounds keep
    /// insertion order).
    pub fn add(&mut self, entry: RangeEntry) {
        if let Some(existing) = self.entries.iter().find(|e| e.overlaps(&entry)) {
            warn!(
                "Street {}: range {}-{} ({}) overlaps {}-{}",
                self.name,
                entry.min(),
                entry.max(),
                entry.parity(),
                existing.min(),
                existing.max()
            );
        }

        let mode = ParityMode::from(entry.parity());
        self.parity_mode = match self.parity_mode {
            None => Some(mode),
            Some(current) if current == mode => Some(current),
            Some(_) => Some(ParityMode::Multi),
        };
        self.max = self.max.max(entry.max());

        let at = self.entries.partition_point(|e| e.min() <= entry.min());
        self.entries.insert(at, entry);
    }

    /// Coordinate for a house number.
    ///
    /// `0` means no number was found in the text and yields the middle range
    /// as a centroid. Numbers outside every range resolve to the range with
    /// the nearest bound and leave a diagnostic in `log`.
    pub fn find(&self, housenumber: u32, log: &mut ErrorLog) -> Result<Coordinate> {
        if self.entries.is_empty() {
            return Err(Error::EmptyStreet {
                street: self.name.clone(),
            });
        }

        if housenumber == 0 {
            return Ok(self.entries[self.entries.len() / 2].coordinate());
        }

        let candidates: Vec<&RangeEntry> = if self.parity_mode == Some(ParityMode::Multi) {
            self.entries
                .iter()
                .filter(|e| e.parity().accepts(housenumber))
                .collect()
        } else {
            self.entries.iter().collect()
        };

        if candidates.is_empty() {
            return Err(Error::EmptyCandidates {
                street: self.name.clone(),
                housenumber,
            });
        }

        let (mut lo, mut hi) = (0, candidates.len());
        loop {
            let len = hi - lo;
            let mid = lo + len / 2;
            let middle = candidates[mid];

            if middle.contains(housenumber) {
                return Ok(middle.coordinate());
            }
            if len == 1 {
                let nearest = nearest_range(&candidates, mid, housenumber);
                log.push(Diagnostic::NearestRange {
                    street: self.name.clone(),
                    housenumber,
                    min: nearest.min(),
                    max: nearest.max(),
                });
                return Ok(nearest.coordinate());
            }

            if housenumber > middle.max() {
                lo = mid;
            } else {
                hi = mid;
            }
        }
    }
}

/// The candidate at `at` or one of its direct neighbours, whichever has the
/// nearest bound. Ties go to `at`, then the previous, then the next range.
fn nearest_range<'a>(candidates: &[&'a RangeEntry], at: usize, housenumber: u32) -> &'a RangeEntry {
    let mut best = candidates[at];
    let neighbours = [at.checked_sub(1), Some(at + 1)];
    for i in neighbours.into_iter().flatten() {
        if let Some(&entry) = candidates.get(i) {
            if entry.boundary_distance(housenumber) < best.boundary_distance(housenumber) {
                best = entry;
            }
        }
    }
    best
}
