//! Name normalization shared by registry construction and text matching.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Remove diacritics: decompose (NFD) and drop combining marks.
pub fn strip_accents(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Canonical key form for city and street names: surrounding quotes and
/// whitespace removed, diacritics stripped, uppercased.
pub fn normalize_name(s: &str) -> String {
    let trimmed = s.trim().trim_matches('"').trim();
    strip_accents(trimmed).to_uppercase()
}

/// Free text prepared for matching against registry names: diacritics
/// stripped, uppercased, otherwise untouched.
pub fn normalize_text(s: &str) -> String {
    strip_accents(s).to_uppercase()
}

/// Postal codes are compared without spaces, uppercased ("3526 kb" -> "3526KB").
pub fn normalize_postal_code(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '"')
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_accents() {
        assert_eq!(strip_accents("Wijk bij Duurstede"), "Wijk bij Duurstede");
        assert_eq!(strip_accents("Zoë's Café"), "Zoe's Cafe");
        assert_eq!(strip_accents("Sûdwest-Fryslân"), "Sudwest-Fryslan");
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("\"Simplonbaan\""), "SIMPLONBAAN");
        assert_eq!(normalize_name("  Gaasterlân-Sleat "), "GAASTERLAN-SLEAT");
        assert_eq!(normalize_name("'s-Hertogenbosch"), "'S-HERTOGENBOSCH");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for name in ["Zoë", "'s-Gravenhage", "Sûdwest-Fryslân", "Noordeinde 12", ""] {
            let once = normalize_name(name);
            assert_eq!(normalize_name(&once), once);
        }
    }

    #[test]
    fn test_normalize_postal_code() {
        assert_eq!(normalize_postal_code("3526 kb"), "3526KB");
        assert_eq!(normalize_postal_code("\"7940XX\""), "7940XX");
    }
}
