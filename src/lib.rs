//! Adreszoeker - Dutch address extraction from free text
//!
//! This library provides the address registry, the matching engine and the
//! data loading shared by the ingest and query binaries.

pub mod config;
pub mod error;
pub mod loader;
pub mod matcher;
pub mod models;
pub mod normalize;
pub mod registry;

pub use config::Config;
pub use error::{Error, Result};
pub use matcher::{Diagnostic, ErrorLog, MatchEngine, MatchOutcome};
pub use models::{Coordinate, MatchHypothesis, Parity, RangeEntry, RegistryRow};
pub use registry::Registry;
