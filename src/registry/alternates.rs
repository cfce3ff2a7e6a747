//! Alternate spellings of city names.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::normalize::normalize_name;

/// Many-to-one mapping from alternate spelling to canonical city name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlternateNames {
    /// Alternate -> canonical
    canonical: HashMap<String, String>,
    /// Canonical -> alternates, in table order
    variants: HashMap<String, Vec<String>>,
}

impl AlternateNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from rows of `(canonical, alternate_1, alternate_2, ...)`.
    /// Names are normalized; empty cells and self-references are ignored.
    pub fn from_rows<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for row in rows {
            let mut names = row.into_iter().map(|s| normalize_name(s.as_ref()));
            let Some(canonical) = names.next().filter(|c| !c.is_empty()) else {
                continue;
            };
            for alternate in names {
                table.insert(&canonical, alternate);
            }
        }
        table
    }

    /// Register one alternate spelling. A later mapping for the same
    /// alternate replaces the earlier one.
    pub fn insert(&mut self, canonical: &str, alternate: String) {
        if alternate.is_empty() || alternate == canonical {
            return;
        }
        if let Some(previous) = self.canonical.insert(alternate.clone(), canonical.to_string()) {
            if let Some(list) = self.variants.get_mut(&previous) {
                list.retain(|a| *a != alternate);
            }
        }
        self.variants
            .entry_ref(canonical)
            .or_default()
            .push(alternate);
    }

    /// Canonical name for an alternate spelling
    pub fn canonical(&self, alternate: &str) -> Option<&str> {
        self.canonical.get(alternate).map(String::as_str)
    }

    /// Other spellings worth trying for `name`, in order: its canonical form
    /// (when `name` is an alternate), then the canonical's alternates.
    /// `name` itself is never included.
    /// The result borrows only from the table, never from `name`.
    pub fn spellings(&self, name: &str) -> Vec<&str> {
        let mut out = Vec::new();
        let variants = match self.canonical(name) {
            Some(canonical) => {
                out.push(canonical);
                self.variants.get(canonical)
            }
            None => self.variants.get(name),
        };
        if let Some(list) = variants {
            out.extend(list.iter().map(String::as_str).filter(|a| *a != name));
        }
        out
    }

    /// All (alternate, canonical) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.canonical
            .iter()
            .map(|(alt, canon)| (alt.as_str(), canon.as_str()))
    }

    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> AlternateNames {
        AlternateNames::from_rows(vec![
            vec!["'s-Gravenhage", "Den Haag", "The Hague"],
            vec!["'s-Hertogenbosch", "Den Bosch", ""],
        ])
    }

    #[test]
    fn test_alternates_map_to_canonical() {
        let t = table();
        assert_eq!(t.canonical("DEN HAAG"), Some("'S-GRAVENHAGE"));
        assert_eq!(t.canonical("THE HAGUE"), Some("'S-GRAVENHAGE"));
        assert_eq!(t.canonical("DEN BOSCH"), Some("'S-HERTOGENBOSCH"));
        assert_eq!(t.canonical("'S-GRAVENHAGE"), None);
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn test_spellings_order() {
        let t = table();
        assert_eq!(t.spellings("DEN HAAG"), vec!["'S-GRAVENHAGE", "THE HAGUE"]);
        assert_eq!(t.spellings("'S-GRAVENHAGE"), vec!["DEN HAAG", "THE HAGUE"]);
        assert!(t.spellings("UTRECHT").is_empty());
    }

    #[test]
    fn test_spellings_outlive_query_name() {
        let t = table();
        let found = {
            let name = String::from("THE HAGUE");
            t.spellings(&name)
        };
        assert_eq!(found, vec!["'S-GRAVENHAGE", "DEN HAAG"]);
    }

    #[test]
    fn test_diacritics_folded() {
        let t = AlternateNames::from_rows(vec![vec!["Súdwest-Fryslân", "Sudwest Fryslan"]]);
        assert_eq!(t.canonical("SUDWEST FRYSLAN"), Some("SUDWEST-FRYSLAN"));
    }
}
