//! Street name fragments ("chops") used when no full street name matches.
//!
//! A street is decomposed into its whitespace-separated words. Words longer
//! than four characters (and different from the city name) are usable
//! fragments; a street made only of short words keeps all of them. A
//! fragment shared by several streets is not distinctive, so each of those
//! streets contributes the fragment extended with its own text before or
//! after it instead.

use hashbrown::HashMap;
use std::collections::BTreeSet;

/// Minimum word length (exclusive) for a word to count as a fragment
const MIN_CHOP_LEN: usize = 4;

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Words of `street` kept as fragments
fn street_chops<'a>(street: &'a str, city: &str) -> Vec<&'a str> {
    let words: Vec<&str> = street.split_whitespace().collect();
    let all_short = words
        .iter()
        .filter(|w| **w != city)
        .map(|w| char_len(w))
        .max()
        .is_some_and(|longest| longest <= MIN_CHOP_LEN);

    words
        .into_iter()
        .filter(|w| (char_len(w) > MIN_CHOP_LEN && *w != city) || all_short)
        .collect()
}

/// `(street, fragment)` pairs for all streets of one city, sorted.
pub fn chop_streets<'a, I>(city: &str, streets: I) -> BTreeSet<(String, String)>
where
    I: IntoIterator<Item = &'a str>,
{
    let chops: Vec<(&str, &str)> = streets
        .into_iter()
        .flat_map(|street| {
            street_chops(street, city)
                .into_iter()
                .map(move |chop| (street, chop))
        })
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for &(_, chop) in &chops {
        *counts.entry(chop).or_default() += 1;
    }

    let mut fragments = BTreeSet::new();
    for (street, chop) in chops {
        if counts[chop] == 1 {
            fragments.insert((street.to_string(), chop.to_string()));
            continue;
        }

        let mut parts = street.split(chop);
        let prefix = parts.next().unwrap_or_default();
        let suffix = parts.next().unwrap_or_default();
        for extended in [format!("{}{}", prefix, chop), format!("{}{}", chop, suffix)] {
            if extended != chop {
                fragments.insert((street.to_string(), extended));
            }
        }
    }
    fragments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragments(city: &str, streets: &[&str]) -> Vec<(String, String)> {
        chop_streets(city, streets.iter().copied()).into_iter().collect()
    }

    fn pair(street: &str, fragment: &str) -> (String, String) {
        (street.to_string(), fragment.to_string())
    }

    #[test]
    fn test_long_words_are_chops() {
        assert_eq!(
            fragments("UTRECHT", &["GRAAF ADOLFSTRAAT"]),
            vec![pair("GRAAF ADOLFSTRAAT", "ADOLFSTRAAT"), pair("GRAAF ADOLFSTRAAT", "GRAAF")]
        );
    }

    #[test]
    fn test_city_name_is_not_a_chop() {
        assert_eq!(
            fragments("BUSSUM", &["BUSSUM BRINKWEG"]),
            vec![pair("BUSSUM BRINKWEG", "BRINKWEG")]
        );
    }

    #[test]
    fn test_short_word_streets_kept_whole() {
        assert_eq!(
            fragments("EDE", &["A 12"]),
            vec![pair("A 12", "12"), pair("A 12", "A")]
        );
        // one long word disables the short-word rule
        assert_eq!(
            fragments("EDE", &["DE KLOMP"]),
            vec![pair("DE KLOMP", "KLOMP")]
        );
    }

    #[test]
    fn test_shared_chop_extended_with_context() {
        let got = fragments("ZEIST", &["KERKSTRAAT OOST", "KERKSTRAAT WEST"]);
        assert_eq!(
            got,
            vec![
                pair("KERKSTRAAT OOST", "KERKSTRAAT OOST"),
                pair("KERKSTRAAT WEST", "KERKSTRAAT WEST"),
            ]
        );
    }

    #[test]
    fn test_shared_chop_with_prefix() {
        let got = fragments("ZEIST", &["OUDE KERKSTRAAT", "NIEUWE KERKSTRAAT"]);
        assert_eq!(
            got,
            vec![
                pair("NIEUWE KERKSTRAAT", "NIEUWE"),
                pair("NIEUWE KERKSTRAAT", "NIEUWE KERKSTRAAT"),
                pair("OUDE KERKSTRAAT", "OUDE KERKSTRAAT"),
            ]
        );
    }
}
