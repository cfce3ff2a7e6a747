//! The address registry: city -> street -> house number ranges.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::alternates::AlternateNames;
use super::city::CityIndex;
use crate::error::Result;
use crate::matcher::ErrorLog;
use crate::models::{Coordinate, RangeEntry, RegistryRow};
use crate::normalize::{normalize_name, normalize_postal_code};

/// Hierarchical address registry.
///
/// Built once with [`Registry::add`] / [`Registry::from_rows`]; every lookup
/// takes `&self`, so a finished registry can be shared between threads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    cities: HashMap<String, CityIndex>,
    alternates: AlternateNames,
    /// Postal code -> (city, street)
    postal_codes: HashMap<String, (String, String)>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alternates(alternates: AlternateNames) -> Self {
        Self {
            alternates,
            ..Self::default()
        }
    }

    /// Build a registry from normalized rows. Rows describing an inverted
    /// range are skipped with a warning.
    pub fn from_rows<I>(rows: I, alternates: AlternateNames) -> Self
    where
        I: IntoIterator<Item = RegistryRow>,
    {
        let mut registry = Self::with_alternates(alternates);
        let mut skipped = 0usize;

        for row in rows {
            match row.to_entry() {
                Ok(entry) => {
                    if let Some(code) = row.postal_code.as_deref() {
                        registry.add_postal_code(code, &row.city, &row.street);
                    }
                    registry.add(&row.city, &row.street, entry);
                }
                Err(e) => {
                    warn!("Skipping row {} / {}: {}", row.city, row.street, e);
                    skipped += 1;
                }
            }
        }

        info!(
            "Registry built: {} cities, {} streets, {} ranges ({} rows skipped)",
            registry.city_count(),
            registry.street_count(),
            registry.range_count(),
            skipped
        );
        registry
    }

    /// Insert a range, creating the city and street on first use
    pub fn add(&mut self, city: &str, street: &str, entry: RangeEntry) {
        let city = normalize_name(city);
        let street = normalize_name(street);
        self.cities
            .entry_ref(city.as_str())
            .or_insert_with(|| CityIndex::new(city.as_str()))
            .add(&street, entry);
    }

    pub fn add_postal_code(&mut self, code: &str, city: &str, street: &str) {
        let code = normalize_postal_code(code);
        if code.is_empty() {
            return;
        }
        self.postal_codes
            .insert(code, (normalize_name(city), normalize_name(street)));
    }

    pub fn alternates(&self) -> &AlternateNames {
        &self.alternates
    }

    pub fn city(&self, name: &str) -> Option<&CityIndex> {
        self.cities.get(name)
    }

    /// The city for `name`, or else for the first of its alternate
    /// spellings present in the registry.
    pub fn resolve_city(&self, name: &str) -> Option<&CityIndex> {
        let name = normalize_name(name);
        self.cities.get(&name).or_else(|| {
            self.alternates
                .spellings(&name)
                .into_iter()
                .find_map(|alt| self.cities.get(alt))
        })
    }

    pub fn cities(&self) -> impl Iterator<Item = &CityIndex> {
        self.cities.values()
    }

    pub fn city_names(&self) -> impl Iterator<Item = &str> {
        self.cities.keys().map(String::as_str)
    }

    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    pub fn street_count(&self) -> usize {
        self.cities.values().map(CityIndex::street_count).sum()
    }

    pub fn range_count(&self) -> usize {
        self.cities
            .values()
            .flat_map(CityIndex::streets)
            .map(|s| s.len())
            .sum()
    }

    /// Coordinate for an address. House number `0` asks for the street's
    /// centroid.
    ///
    /// A miss on the city (or on the street within it) is retried with the
    /// city's alternate spellings in table order. `Ok(None)` once all are
    /// exhausted; `Err` only for registry defects.
    pub fn find(
        &self,
        city: &str,
        street: &str,
        housenumber: u32,
        log: &mut ErrorLog,
    ) -> Result<Option<Coordinate>> {
        let city = normalize_name(city);
        let street = normalize_name(street);
        debug!("Looking up {}, {}, {}", city, street, housenumber);

        if let Some(found) = self.find_in(&city, &street, housenumber, log)? {
            return Ok(Some(found));
        }

        for alternate in self.alternates.spellings(&city) {
            debug!("{} not found in registry, trying alternate {}", city, alternate);
            if let Some(found) = self.find_in(alternate, &street, housenumber, log)? {
                return Ok(Some(found));
            }
            debug!("Alternate {} gave no result", alternate);
        }

        Ok(None)
    }

    fn find_in(
        &self,
        city: &str,
        street: &str,
        housenumber: u32,
        log: &mut ErrorLog,
    ) -> Result<Option<Coordinate>> {
        match self.cities.get(city) {
            Some(index) => index.find(street, housenumber, log),
            None => Ok(None),
        }
    }

    /// (city, street) registered for a postal code
    pub fn postal_code(&self, code: &str) -> Option<(&str, &str)> {
        self.postal_codes
            .get(&normalize_postal_code(code))
            .map(|(city, street)| (city.as_str(), street.as_str()))
    }

    /// Street centroid for a postal code
    pub fn find_by_postal_code(
        &self,
        code: &str,
        log: &mut ErrorLog,
    ) -> Result<Option<Coordinate>> {
        match self.postal_code(code) {
            Some((city, street)) => self.find(city, street, 0, log),
            None => Ok(None),
        }
    }
}
