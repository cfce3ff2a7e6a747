//! House number ranges and their coordinates.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Planar coordinate (Dutch RD, metres)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Parity class of a house number range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Parity {
    /// Only even numbers
    Even,
    /// Only odd numbers
    Odd,
    /// Both
    Mixed,
}

impl Parity {
    /// Parity class of a single house number (never `Mixed`)
    pub fn of(housenumber: u32) -> Self {
        if housenumber % 2 == 0 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }

    /// Whether a house number may appear in a range of this class
    pub fn accepts(&self, housenumber: u32) -> bool {
        *self == Parity::Mixed || *self == Parity::of(housenumber)
    }
}

impl FromStr for Parity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().trim_matches('"').to_ascii_uppercase().as_str() {
            "EVEN" => Ok(Parity::Even),
            "ODD" => Ok(Parity::Odd),
            "MIXED" => Ok(Parity::Mixed),
            _ => Err(Error::UnknownParity(s.to_string())),
        }
    }
}

impl std::fmt::Display for Parity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Parity::Even => write!(f, "EVEN"),
            Parity::Odd => write!(f, "ODD"),
            Parity::Mixed => write!(f, "MIXED"),
        }
    }
}

/// A contiguous interval of house numbers mapped to one coordinate.
///
/// Immutable once built; bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeEntry {
    min: u32,
    max: u32,
    parity: Parity,
    coordinate: Coordinate,
}

impl RangeEntry {
    pub fn new(min: u32, max: u32, parity: Parity, coordinate: Coordinate) -> Result<Self> {
        if max < min {
            return Err(Error::InvalidRange { min, max });
        }
        Ok(Self {
            min,
            max,
            parity,
            coordinate,
        })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn parity(&self) -> Parity {
        self.parity
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Inclusive bounds check, parity not considered
    pub fn contains(&self, housenumber: u32) -> bool {
        self.min <= housenumber && housenumber <= self.max
    }

    /// Distance from a house number to the nearer bound of this range
    pub fn boundary_distance(&self, housenumber: u32) -> u32 {
        self.min
            .abs_diff(housenumber)
            .min(self.max.abs_diff(housenumber))
    }

    /// True when both ranges share a parity class and their bounds intersect
    pub fn overlaps(&self, other: &RangeEntry) -> bool {
        self.parity == other.parity && self.min <= other.max && other.min <= self.max
    }
}
