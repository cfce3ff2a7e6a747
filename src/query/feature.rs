//! Match outcomes rendered as GeoJSON-like features.

use serde::Serialize;

use adreszoeker::{MatchHypothesis, MatchOutcome};

/// One hypothesis in GeoJSON-like format
#[derive(Debug, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub result_type: &'static str,
    /// `None` for an unresolved address
    pub geometry: Option<Geometry>,
    pub properties: Properties,
}

/// RD (Rijksdriehoek) point, `[x, y]`
#[derive(Debug, Serialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub geo_type: &'static str,
    pub coordinates: [f64; 2],
}

#[derive(Debug, Serialize)]
pub struct Properties {
    pub city: Option<String>,
    pub street: Option<String>,
    pub housenumber: Option<u32>,
    pub input: String,
    pub diagnostics: Vec<String>,
}

impl Feature {
    pub fn from_hypothesis(hypothesis: &MatchHypothesis, diagnostics: Vec<String>) -> Self {
        Self {
            result_type: "Feature",
            geometry: hypothesis.coordinate.map(|c| Geometry {
                geo_type: "Point",
                coordinates: [c.x, c.y],
            }),
            properties: Properties {
                city: hypothesis.city.clone(),
                street: hypothesis.street.clone(),
                housenumber: hypothesis.housenumber,
                input: hypothesis.input.to_string(),
                diagnostics,
            },
        }
    }
}

/// Features of one outcome; each carries the outcome's diagnostics
pub fn features(outcome: &MatchOutcome) -> Vec<Feature> {
    let diagnostics = outcome.log.messages();
    outcome
        .hypotheses
        .iter()
        .map(|h| Feature::from_hypothesis(h, diagnostics.clone()))
        .collect()
}
