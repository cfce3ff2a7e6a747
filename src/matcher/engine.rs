//! Address extraction from free text.
//!
//! A match runs through fixed stages: city scan, street scan (falling back
//! to chop fragments), disambiguation, house number extraction and
//! coordinate resolution. Ambiguity is recorded in the outcome's
//! [`ErrorLog`]; only registry defects abort a match with an error.

use hashbrown::HashMap;
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

use super::chop::chop_streets;
use super::log::{Diagnostic, ErrorLog};
use super::scanner::TokenScanner;
use crate::error::Result;
use crate::models::MatchHypothesis;
use crate::normalize::normalize_text;
use crate::registry::{CityIndex, Registry};

type Pair<'a> = (&'a str, &'a str);

/// Result of matching one input string
#[derive(Debug, Clone, Serialize)]
pub struct MatchOutcome {
    pub input: Arc<str>,
    /// Empty when the text names no known city
    pub hypotheses: Vec<MatchHypothesis>,
    pub log: ErrorLog,
}

impl MatchOutcome {
    fn empty(input: Arc<str>, log: ErrorLog) -> Self {
        Self {
            input,
            hypotheses: Vec::new(),
            log,
        }
    }

    fn not_available(input: Arc<str>, log: ErrorLog) -> Self {
        Self {
            hypotheses: vec![MatchHypothesis::not_available(Arc::clone(&input))],
            input,
            log,
        }
    }

    /// Hypotheses that carry a coordinate
    pub fn resolved(&self) -> impl Iterator<Item = &MatchHypothesis> {
        self.hypotheses.iter().filter(|h| h.is_available())
    }
}

/// Street name scanners of one city
#[derive(Debug)]
struct CityScanners {
    streets: TokenScanner,
    /// Chop fragment -> street
    fragments: TokenScanner,
}

impl CityScanners {
    fn build(city: &CityIndex) -> Result<Self> {
        let streets = TokenScanner::from_names(city.street_names())?;
        let fragments = TokenScanner::new(
            chop_streets(city.name(), city.street_names())
                .into_iter()
                .map(|(street, fragment)| (fragment, street)),
        )?;
        Ok(Self { streets, fragments })
    }
}

/// Matches free text against a registry.
///
/// All automata are built up front; matching itself is read-only, so one
/// engine can serve many threads.
pub struct MatchEngine {
    registry: Registry,
    /// City names and alternate spellings -> registry city name
    cities: TokenScanner,
    streets: HashMap<String, CityScanners>,
    /// Digits after one whitespace character, applied right after a street name
    housenumber: Regex,
}

impl MatchEngine {
    pub fn new(registry: Registry) -> Result<Self> {
        let mut city_patterns: HashMap<String, String> = HashMap::new();
        for (alternate, canonical) in registry.alternates().iter() {
            let target = registry
                .resolve_city(canonical)
                .or_else(|| registry.resolve_city(alternate));
            if let Some(city) = target {
                city_patterns.insert(alternate.to_string(), city.name().to_string());
            }
        }
        for name in registry.city_names() {
            city_patterns.insert(name.to_string(), name.to_string());
        }
        let cities = TokenScanner::new(city_patterns)?;

        let indexes: Vec<&CityIndex> = registry.cities().collect();
        let streets = indexes
            .par_iter()
            .map(|city| -> Result<(String, CityScanners)> {
                Ok((city.name().to_string(), CityScanners::build(city)?))
            })
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .collect();

        info!(
            "Match engine ready: {} city patterns, {} cities",
            cities.pattern_count(),
            indexes.len()
        );

        Ok(Self {
            registry,
            cities,
            streets,
            housenumber: Regex::new(r"^\s([0-9]+)")?,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Extract addresses from `text`.
    ///
    /// - no known city: no hypotheses, empty log
    /// - cities but no resolvable street: one unavailable hypothesis
    /// - otherwise one hypothesis per accepted (city, street) pair
    pub fn match_text(&self, text: &str) -> Result<MatchOutcome> {
        let input: Arc<str> = Arc::from(text);
        let normalized = normalize_text(text);
        let mut log = ErrorLog::new();

        let cities: Vec<&str> = self.cities.scan(&normalized).into_iter().collect();
        debug!("City candidates: {:?}", cities);
        if cities.is_empty() {
            return Ok(MatchOutcome::empty(input, log));
        }

        let mut pairs = self.scan_streets(&cities, &normalized, |s| &s.streets);
        debug!("Street candidates: {:?}", pairs);
        if pairs.len() != 1 {
            let chopped = self.scan_streets(&cities, &normalized, |s| &s.fragments);
            debug!("Chop candidates: {:?}", chopped);
            if !chopped.is_empty() {
                pairs = chopped;
            }
        }

        let accepted = select(pairs.into_iter().collect(), &normalized, &mut log);
        if accepted.is_empty() {
            return Ok(MatchOutcome::not_available(input, log));
        }

        let mut hypotheses = Vec::with_capacity(accepted.len());
        for (city, street) in accepted {
            let housenumber = self.extract_housenumber(city, street, &normalized, &mut log);
            match self.registry.find(city, street, housenumber, &mut log)? {
                Some(coordinate) => hypotheses.push(MatchHypothesis::resolved(
                    city,
                    street,
                    housenumber,
                    coordinate,
                    Arc::clone(&input),
                )),
                None => {
                    debug!("{} - {} not in registry, discarding all hypotheses", city, street);
                    return Ok(MatchOutcome::not_available(input, log));
                }
            }
        }

        Ok(MatchOutcome {
            input,
            hypotheses,
            log,
        })
    }

    /// [`MatchEngine::match_text`] over many inputs in parallel; results
    /// keep the input order.
    pub fn match_batch<S>(&self, texts: &[S]) -> Vec<Result<MatchOutcome>>
    where
        S: AsRef<str> + Sync,
    {
        texts
            .par_iter()
            .map(|text| self.match_text(text.as_ref()))
            .collect()
    }

    /// Street centroid for a postal code, as a match outcome
    pub fn find_by_postal_code(&self, code: &str) -> Result<MatchOutcome> {
        let input: Arc<str> = Arc::from(code);
        let mut log = ErrorLog::new();

        let Some((city, street)) = self.registry.postal_code(code) else {
            return Ok(MatchOutcome::not_available(input, log));
        };
        match self.registry.find(city, street, 0, &mut log)? {
            Some(coordinate) => Ok(MatchOutcome {
                hypotheses: vec![MatchHypothesis::resolved(
                    city,
                    street,
                    0,
                    coordinate,
                    Arc::clone(&input),
                )],
                input,
                log,
            }),
            None => Ok(MatchOutcome::not_available(input, log)),
        }
    }

    fn scan_streets<'a, F>(&'a self, cities: &[&'a str], text: &str, scanner: F) -> BTreeSet<Pair<'a>>
    where
        F: Fn(&'a CityScanners) -> &'a TokenScanner,
    {
        cities
            .iter()
            .filter_map(|city| self.streets.get(*city).map(|s| (*city, scanner(s))))
            .flat_map(|(city, tokens)| {
                tokens
                    .scan(text)
                    .into_iter()
                    .map(move |street| (city, street))
            })
            .collect()
    }

    /// Digits directly after `street` and one whitespace character; `0` when
    /// there are none.
    fn extract_housenumber(&self, city: &str, street: &str, text: &str, log: &mut ErrorLog) -> u32 {
        let numbers: Vec<&str> = text
            .match_indices(street)
            .filter_map(|(start, _)| self.housenumber.captures(&text[start + street.len()..]))
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .collect();

        if numbers.len() > 1 {
            log.push(Diagnostic::MultipleHouseNumbers {
                numbers: numbers.iter().map(|n| n.to_string()).collect(),
                city: city.to_string(),
                street: street.to_string(),
                input: text.to_string(),
            });
        }
        numbers.first().and_then(|n| n.parse().ok()).unwrap_or(0)
    }
}

/// Reduce candidate pairs to the accepted ones. Empty means no address.
fn select<'a>(pairs: Vec<Pair<'a>>, text: &str, log: &mut ErrorLog) -> Vec<Pair<'a>> {
    let candidates = owned(&pairs);
    let pairs = if pairs.len() > 1 {
        disambiguate(pairs, text, log)
    } else {
        pairs
    };

    match pairs.len() {
        0 => log.push(Diagnostic::NoCityStreet {
            pairs: candidates,
            input: text.to_string(),
        }),
        1 => {}
        _ => log.push(Diagnostic::MultipleStreets {
            pairs: owned(&pairs),
            input: text.to_string(),
        }),
    }
    pairs
}

fn owned(pairs: &[Pair<'_>]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(city, street)| (city.to_string(), street.to_string()))
        .collect()
}

/// Keep the most specific street names that also occur whitespace-bounded.
fn disambiguate<'a>(pairs: Vec<Pair<'a>>, text: &str, log: &mut ErrorLog) -> Vec<Pair<'a>> {
    let cities: BTreeSet<&str> = pairs.iter().map(|(city, _)| *city).collect();
    if cities.len() > 1 {
        log.push(Diagnostic::MultipleCities {
            cities: cities.iter().map(|c| c.to_string()).collect(),
            input: text.to_string(),
        });
    }

    let streets: Vec<&str> = pairs.iter().map(|(_, street)| *street).collect();
    let scores: Vec<usize> = streets
        .iter()
        .map(|x| streets.iter().filter(|y| specificity_point(x, y)).count())
        .collect();
    let best = scores.iter().copied().max().unwrap_or(0);

    let mut survivors: BTreeSet<&str> = BTreeSet::new();
    for (street, score) in streets.iter().zip(&scores) {
        if *score == best && !survivors.contains(street) && occurs_spaced(street, text) {
            survivors.insert(*street);
        }
    }
    debug!("Disambiguated streets: {:?}", survivors);

    pairs
        .into_iter()
        .filter(|(_, street)| survivors.contains(street))
        .collect()
}

/// `x` earns a point against `y` when it strictly contains `y`, or when
/// neither contains the other.
fn specificity_point(x: &str, y: &str) -> bool {
    let y_in_x = x.contains(y);
    let x_in_y = y.contains(x);
    (y_in_x && !x_in_y) || (!y_in_x && !x_in_y)
}

/// `name` occurs with whitespace on at least one side and whitespace or the
/// text edge on the other.
fn occurs_spaced(name: &str, text: &str) -> bool {
    let spaced = |c: Option<char>| c.is_some_and(char::is_whitespace);
    text.match_indices(name).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + name.len()..].chars().next();
        (spaced(before) && (after.is_none() || spaced(after)))
            || ((before.is_none() || spaced(before)) && spaced(after))
    })
}
