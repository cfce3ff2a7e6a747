//! Match results produced per input string.

use serde::Serialize;
use std::sync::Arc;

use super::range::Coordinate;

/// One candidate (city, street, house number, coordinate) tuple.
///
/// An unavailable hypothesis has every field `None`; it stands for
/// "an address was looked for but could not be resolved".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchHypothesis {
    pub city: Option<String>,
    pub street: Option<String>,
    pub housenumber: Option<u32>,
    pub coordinate: Option<Coordinate>,
    /// The text this hypothesis was extracted from
    pub input: Arc<str>,
}

impl MatchHypothesis {
    pub fn resolved(
        city: &str,
        street: &str,
        housenumber: u32,
        coordinate: Coordinate,
        input: Arc<str>,
    ) -> Self {
        Self {
            city: Some(city.to_string()),
            street: Some(street.to_string()),
            housenumber: Some(housenumber),
            coordinate: Some(coordinate),
            input,
        }
    }

    pub fn not_available(input: Arc<str>) -> Self {
        Self {
            city: None,
            street: None,
            housenumber: None,
            coordinate: None,
            input,
        }
    }

    pub fn is_available(&self) -> bool {
        self.coordinate.is_some()
    }
}

impl std::fmt::Display for MatchHypothesis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.city, &self.street, self.housenumber, self.coordinate) {
            (Some(city), Some(street), Some(number), Some(c)) => {
                write!(f, "{} {} {} x = {}, y = {}", city, street, number, c.x, c.y)
            }
            _ => write!(f, "NA NA NA x = NA, y = NA"),
        }
    }
}
