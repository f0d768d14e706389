//! String folding used for every comparison in the catalog.
use std::sync::LazyLock;

use icu_normalizer::DecomposingNormalizerBorrowed;
use icu_properties::{CodePointSetData, props::Diacritic};
use regex::Regex;
use smallvec::SmallVec;

/// Fold `s` for comparison: canonical decomposition, diacritics removed, lowercased.
///
/// Marks are removed if they carry the Unicode `Diacritic` property or fall in
/// the Combining Diacritical Marks block (U+0300..=U+036F).
pub fn normalize(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }

    let diacritics = CodePointSetData::new::<Diacritic>();
    DecomposingNormalizerBorrowed::new_nfd()
        .normalize(s)
        .chars()
        .filter(|&c| !diacritics.contains(c) && !('\u{0300}'..='\u{036f}').contains(&c))
        .collect::<String>()
        .to_lowercase()
}

/// Fold a header key: lowercased, with everything but letters and digits removed.
pub fn normalize_key(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Tidy a cell for display. Control characters and runs of whitespace become
/// single spaces, and the ends are trimmed.
pub fn clean_cell(s: &str) -> String {
    s.split(|c: char| c.is_whitespace() || c.is_control())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The canonical gender tokens.
pub const FEMALE: &str = "female";
/// See [`FEMALE`].
pub const MALE: &str = "male";

/// Map the spellings of a gender (`F`, `female`, `Female (composer)`, ...) to
/// [`FEMALE`] or [`MALE`]; anything else comes back normalized.
pub fn canonical_gender(s: &str) -> String {
    static FEMALE_WORD: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\bfemale\b").expect("valid regex"));
    static MALE_WORD: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\bmale\b").expect("valid regex"));

    let n = normalize(s);
    let n = n.trim();
    match n {
        "" => String::new(),
        "f" | FEMALE => FEMALE.to_string(),
        "m" | MALE => MALE.to_string(),
        _ if FEMALE_WORD.is_match(n) => FEMALE.to_string(),
        _ if MALE_WORD.is_match(n) => MALE.to_string(),
        _ => n.to_string(),
    }
}

/// Split a gender cell on `;`, `,`, `/` or `|` and canonicalize each piece.
pub fn gender_tokens(s: &str) -> SmallVec<[String; 2]> {
    s.split([';', ',', '/', '|'])
        .map(canonical_gender)
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_diacritics_and_case() {
        assert_eq!(normalize("Chaikovskiĭ"), normalize("Chaikovskii"));
        assert_eq!(normalize("Glière, Reinhold"), "gliere, reinhold");
        assert_eq!(normalize("DVOŘÁK"), "dvorak");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_keeps_cyrillic_letters() {
        assert_eq!(normalize("Шостакович"), "шостакович");
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Soviet republic (EN)"), "sovietrepublicen");
        assert_eq!(normalize_key("Композитор:"), "композитор");
        assert_eq!(normalize_key("Life span"), "lifespan");
    }

    #[test]
    fn test_clean_cell() {
        assert_eq!(clean_cell("  Abramyan,\n\tEduard\u{0007} "), "Abramyan, Eduard");
        assert_eq!(clean_cell("\u{0000}"), "");
    }

    #[test]
    fn test_canonical_gender() {
        assert_eq!(canonical_gender("F"), FEMALE);
        assert_eq!(canonical_gender("Female"), FEMALE);
        assert_eq!(canonical_gender(" m "), MALE);
        assert_eq!(canonical_gender("Male composer"), MALE);
        assert_eq!(canonical_gender("female (attributed)"), FEMALE);
        assert_eq!(canonical_gender("Transgender"), "transgender");
        assert_eq!(canonical_gender(""), "");
    }

    #[test]
    fn test_gender_tokens() {
        assert_eq!(gender_tokens("F; M").as_slice(), [FEMALE, MALE]);
        assert_eq!(gender_tokens("male/|other").as_slice(), [MALE, "other"]);
        assert!(gender_tokens("").is_empty());
    }
}
