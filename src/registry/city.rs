//! Streets of a single city.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::street::StreetIndex;
use crate::error::Result;
use crate::matcher::ErrorLog;
use crate::models::{Coordinate, RangeEntry};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityIndex {
    name: String,
    streets: HashMap<String, StreetIndex>,
}

impl CityIndex {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            streets: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a range to a street, creating the street on first use
    pub fn add(&mut self, street: &str, entry: RangeEntry) {
        self.streets
            .entry_ref(street)
            .or_insert_with(|| StreetIndex::new(street))
            .add(entry);
    }

    pub fn street(&self, name: &str) -> Option<&StreetIndex> {
        self.streets.get(name)
    }

    pub fn street_names(&self) -> impl Iterator<Item = &str> {
        self.streets.keys().map(String::as_str)
    }

    pub fn streets(&self) -> impl Iterator<Item = &StreetIndex> {
        self.streets.values()
    }

    pub fn street_count(&self) -> usize {
        self.streets.len()
    }

    /// Coordinate of a house number on one of this city's streets.
    /// `Ok(None)` when the street is unknown here.
    pub fn find(
        &self,
        street: &str,
        housenumber: u32,
        log: &mut ErrorLog,
    ) -> Result<Option<Coordinate>> {
        match self.street(street) {
            Some(index) => index.find(housenumber, log).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Parity;

    #[test]
    fn test_streets_created_on_first_add() {
        let mut city = CityIndex::new("ZEIST");
        for (min, max) in [(1, 9), (11, 19)] {
            let entry = RangeEntry::new(min, max, Parity::Odd, Coordinate::new(1.0, 2.0)).unwrap();
            city.add("SLOTLAAN", entry);
        }

        assert_eq!(city.street_count(), 1);
        assert_eq!(city.street("SLOTLAAN").map(StreetIndex::len), Some(2));
        assert!(city.street("DORPSSTRAAT").is_none());
    }

    #[test]
    fn test_find_unknown_street_is_none() {
        let mut city = CityIndex::new("ZEIST");
        let entry = RangeEntry::new(1, 9, Parity::Odd, Coordinate::new(1.0, 2.0)).unwrap();
        city.add("SLOTLAAN", entry);

        let mut log = ErrorLog::new();
        assert_eq!(city.find("DORPSSTRAAT", 3, &mut log).unwrap(), None);
        assert_eq!(
            city.find("SLOTLAAN", 3, &mut log).unwrap(),
            Some(Coordinate::new(1.0, 2.0))
        );
    }
}
