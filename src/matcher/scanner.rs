//! Token-bounded multi-pattern search over normalized text.

use aho_corasick::AhoCorasick;
use hashbrown::HashMap;
use std::collections::BTreeSet;

use crate::error::Result;

/// Characters that may flank a name, besides whitespace and the text edges.
pub const DELIMITERS: &[char] = &['\\', '/', ',', ';', '(', ')', '.', ':', '!', '?', '"'];

/// Whether `c` may border a token
pub fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || DELIMITERS.contains(&c)
}

/// True when `text[start..end]` is flanked by delimiters or text edges
pub fn is_token_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    before.map_or(true, is_delimiter) && after.map_or(true, is_delimiter)
}

/// One automaton over many names, each name carrying one or more payloads
/// (for example the street a chop fragment belongs to).
#[derive(Debug, Clone)]
pub struct TokenScanner {
    automaton: AhoCorasick,
    payloads: Vec<Vec<String>>,
}

impl TokenScanner {
    /// Build from `(pattern, payload)` pairs. Empty patterns are dropped;
    /// repeated patterns collect all their payloads.
    pub fn new<I, P, Q>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, Q)>,
        P: Into<String>,
        Q: Into<String>,
    {
        let mut slots: HashMap<String, usize> = HashMap::new();
        let mut patterns: Vec<String> = Vec::new();
        let mut payloads: Vec<Vec<String>> = Vec::new();

        for (pattern, payload) in entries {
            let pattern = pattern.into();
            if pattern.is_empty() {
                continue;
            }
            let slot = *slots.entry(pattern.clone()).or_insert_with(|| {
                patterns.push(pattern);
                payloads.push(Vec::new());
                payloads.len() - 1
            });
            let payload = payload.into();
            if !payloads[slot].contains(&payload) {
                payloads[slot].push(payload);
            }
        }

        let automaton = AhoCorasick::new(&patterns)?;
        Ok(Self {
            automaton,
            payloads,
        })
    }

    /// Scanner whose payload is the pattern itself
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(names.into_iter().map(|n| {
            let n = n.as_ref().to_string();
            (n.clone(), n)
        }))
    }

    pub fn pattern_count(&self) -> usize {
        self.payloads.len()
    }

    /// Payloads of every pattern occurring in `text` as a whole token,
    /// in lexicographic order.
    pub fn scan<'a>(&'a self, text: &str) -> BTreeSet<&'a str> {
        let mut found = BTreeSet::new();
        for m in self.automaton.find_overlapping_iter(text) {
            if is_token_bounded(text, m.start(), m.end()) {
                found.extend(self.payloads[m.pattern().as_usize()].iter().map(String::as_str));
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_bounded_match() {
        let scanner = TokenScanner::from_names(["DAM", "UTRECHT"]).unwrap();
        assert!(scanner.scan("WONING AAN DAMSTRAAT").is_empty());
        assert_eq!(
            scanner.scan("OP DE DAM, TE UTRECHT."),
            BTreeSet::from(["DAM", "UTRECHT"])
        );
    }

    #[test]
    fn test_text_edges_and_delimiters() {
        let scanner = TokenScanner::from_names(["EDE"]).unwrap();
        assert_eq!(scanner.scan("EDE").len(), 1);
        assert_eq!(scanner.scan("(EDE)").len(), 1);
        assert_eq!(scanner.scan("ARNHEM/EDE").len(), 1);
        assert!(scanner.scan("LEEDEN").is_empty());
        assert!(scanner.scan("EDE-WAGENINGEN").is_empty());
    }

    #[test]
    fn test_overlapping_patterns_all_reported() {
        let scanner = TokenScanner::from_names(["STRAAT", "NIEUWSTRAAT", "NIEUW"]).unwrap();
        assert_eq!(scanner.scan("NIEUWSTRAAT 5"), BTreeSet::from(["NIEUWSTRAAT"]));
        assert_eq!(
            scanner.scan("NIEUW STRAAT"),
            BTreeSet::from(["NIEUW", "STRAAT"])
        );
    }

    #[test]
    fn test_multi_word_pattern() {
        let scanner = TokenScanner::from_names(["VAN DAM STRAAT", "DAM"]).unwrap();
        assert_eq!(
            scanner.scan("IN DE VAN DAM STRAAT 3"),
            BTreeSet::from(["DAM", "VAN DAM STRAAT"])
        );
    }

    #[test]
    fn test_payloads_grouped() {
        let scanner = TokenScanner::new([
            ("DEN HAAG", "'S-GRAVENHAGE"),
            ("THE HAGUE", "'S-GRAVENHAGE"),
            ("", "IGNORED"),
        ])
        .unwrap();
        assert_eq!(scanner.pattern_count(), 2);
        assert_eq!(
            scanner.scan("STORING IN DEN HAAG"),
            BTreeSet::from(["'S-GRAVENHAGE"])
        );
    }

    #[test]
    fn test_non_ascii_boundaries() {
        let scanner = TokenScanner::from_names(["ZOE"]).unwrap();
        assert!(scanner.scan("ÉZOE").is_empty());
        assert_eq!(scanner.scan("« ZOE »").len(), 1);
    }
}
