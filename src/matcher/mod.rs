//! Free-text address matching.
//!
//! [`MatchEngine`] owns a [`crate::registry::Registry`] and turns input
//! strings into [`crate::models::MatchHypothesis`] values plus an
//! [`ErrorLog`] of everything that was ambiguous along the way.

mod chop;
mod engine;
mod log;
mod scanner;

pub use chop::chop_streets;
pub use engine::{MatchEngine, MatchOutcome};
pub use log::{Diagnostic, ErrorLog};
pub use scanner::{is_delimiter, is_token_bounded, TokenScanner, DELIMITERS};
