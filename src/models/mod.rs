//! Core data models for the address registry.

pub mod hypothesis;
pub mod range;
pub mod row;

pub use hypothesis::MatchHypothesis;
pub use range::{Coordinate, Parity, RangeEntry};
pub use row::RegistryRow;
