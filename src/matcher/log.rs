//! Append-only record of ambiguous or contradictory matches.

use serde::Serialize;
use tracing::warn;

/// A single non-fatal finding made while resolving an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// No range contains the house number; the nearest range was used.
    NearestRange {
        street: String,
        housenumber: u32,
        min: u32,
        max: u32,
    },
    /// Cities were found, but no (city, street) pair could be accepted.
    /// `pairs` holds the rejected candidates, if any.
    NoCityStreet {
        pairs: Vec<(String, String)>,
        input: String,
    },
    /// More than one city among the candidate pairs.
    MultipleCities { cities: Vec<String>, input: String },
    /// Several (city, street) pairs survived disambiguation.
    MultipleStreets {
        pairs: Vec<(String, String)>,
        input: String,
    },
    /// More than one number follows the street name; the first was used.
    MultipleHouseNumbers {
        numbers: Vec<String>,
        city: String,
        street: String,
        input: String,
    },
}

fn join_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(city, street)| format!("{} - {}", city, street))
        .collect::<Vec<_>>()
        .join(" and ")
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::NearestRange {
                street,
                housenumber,
                min,
                max,
            } => write!(
                f,
                "street \"{}\": nearest range to house number {} is {}-{}",
                street, housenumber, min, max
            ),
            Diagnostic::NoCityStreet { pairs, input } if pairs.is_empty() => {
                write!(f, "no city - street combination found in \"{}\"", input)
            }
            Diagnostic::NoCityStreet { pairs, input } => write!(
                f,
                "none of {} city - street combinations accepted: {} in \"{}\"",
                pairs.len(),
                join_pairs(pairs),
                input
            ),
            Diagnostic::MultipleCities { cities, input } => write!(
                f,
                "multiple cities found: {} for \"{}\"",
                cities.join(", "),
                input
            ),
            Diagnostic::MultipleStreets { pairs, input } => write!(
                f,
                "multiple addresses found: {} in \"{}\"",
                join_pairs(pairs),
                input
            ),
            Diagnostic::MultipleHouseNumbers {
                numbers,
                city,
                street,
                input,
            } => write!(
                f,
                "multiple house numbers found: {} in {} - {} in \"{}\"",
                numbers.join(", "),
                city,
                street,
                input
            ),
        }
    }
}

/// Ordered diagnostics for one match call (or one longer-lived caller).
///
/// Entries are never removed. Each push is mirrored to `tracing` at warn level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorLog {
    entries: Vec<Diagnostic>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Rendered diagnostic strings, in insertion order
    pub fn messages(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_keeps_order() {
        let mut log = ErrorLog::new();
        log.push(Diagnostic::MultipleCities {
            cities: vec!["UTRECHT".to_string(), "ZEIST".to_string()],
            input: "UTRECHT ZEIST".to_string(),
        });
        log.push(Diagnostic::NearestRange {
            street: "KERKSTRAAT".to_string(),
            housenumber: 40,
            min: 2,
            max: 30,
        });

        assert_eq!(log.len(), 2);
        let messages = log.messages();
        assert!(messages[0].contains("UTRECHT, ZEIST"));
        assert_eq!(
            messages[1],
            "street \"KERKSTRAAT\": nearest range to house number 40 is 2-30"
        );
    }

    #[test]
    fn test_no_city_street_message() {
        let diagnostic = Diagnostic::NoCityStreet {
            pairs: vec![],
            input: "BRAND IN UTRECHT".to_string(),
        };
        assert_eq!(
            diagnostic.to_string(),
            "no city - street combination found in \"BRAND IN UTRECHT\""
        );

        let diagnostic = Diagnostic::NoCityStreet {
            pairs: vec![
                ("UTRECHT".to_string(), "KERKSTRAAT".to_string()),
                ("ZEIST".to_string(), "KERKSTRAAT".to_string()),
            ],
            input: "KERKSTRAAT, UTRECHT, ZEIST".to_string(),
        };
        assert_eq!(
            diagnostic.to_string(),
            "none of 2 city - street combinations accepted: UTRECHT - KERKSTRAAT and ZEIST - KERKSTRAAT in \"KERKSTRAAT, UTRECHT, ZEIST\""
        );
    }
}
