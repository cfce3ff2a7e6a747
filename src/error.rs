//! Error types for registry construction and address lookup.
//!
//! Ordinary outcomes (ambiguous text, unknown city, no address at all) are
//! not errors: they travel as `Option`/`MatchOutcome` values. Variants here
//! are either registry defects or failures of the data collaborators.

use thiserror::Error;

/// Main error type for the library.
#[derive(Debug, Error)]
pub enum Error {
    /// Parity filtering left no range to search: the loaded data classifies
    /// ranges inconsistently with the street's parity mode.
    #[error("no range of street '{street}' accepts the parity of house number {housenumber}")]
    EmptyCandidates { street: String, housenumber: u32 },

    /// A street index without any ranges.
    #[error("street '{street}' has no house number ranges")]
    EmptyStreet { street: String },

    /// Range bounds in the wrong order.
    #[error("invalid house number range {min}-{max}")]
    InvalidRange { min: u32, max: u32 },

    /// Unrecognised `number_type` value.
    #[error("unknown number type '{0}', expected EVEN, ODD or MIXED")]
    UnknownParity(String),

    /// Every configured encoding failed to decode the source.
    #[error("decoding {source_name} failed with all configured encodings")]
    Decoding { source_name: String },

    /// Every download attempt failed with a retryable error.
    #[error("download of {url} failed after {attempts} attempts: {message}")]
    DownloadFailed {
        url: String,
        attempts: u32,
        message: String,
    },

    /// The named member is not in the archive.
    #[error("archive has no member '{0}'")]
    MissingMember(String),

    #[error("failed to build name automaton: {0}")]
    Automaton(#[from] aho_corasick::BuildError),

    #[error("invalid match pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for registry-consistency defects, as opposed to I/O or input problems.
    pub fn is_defect(&self) -> bool {
        matches!(
            self,
            Error::EmptyCandidates { .. } | Error::EmptyStreet { .. }
        )
    }
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_candidates_display() {
        let err = Error::EmptyCandidates {
            street: "KERKSTRAAT".to_string(),
            housenumber: 7,
        };
        assert!(err.to_string().contains("KERKSTRAAT"));
        assert!(err.to_string().contains('7'));
        assert!(err.is_defect());
    }

    #[test]
    fn test_decoding_is_not_defect() {
        let err = Error::Decoding {
            source_name: "postcode_NL.csv".to_string(),
        };
        assert!(!err.is_defect());
        assert_eq!(
            err.to_string(),
            "decoding postcode_NL.csv failed with all configured encodings"
        );
    }
}
