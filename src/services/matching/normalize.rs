use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use unaccent::unaccent;

/// Separators that join artists or title parts and carry no meaning for matching.
const SEPARATORS: [&str; 3] = [" x ", " vs ", " - "];

static VERSION_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(original mix|extended mix|radio edit|mixed|remastered|remaster|version)\b")
        .expect("version marker pattern is valid")
});

static BRACKETED_CREDITS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[(\[]\s*(ft\.?|feat\.?|featuring|prod\.?|with)\s[^)\]]*[)\]]?")
        .expect("bracketed credit pattern is valid")
});

static TRAILING_CREDITS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s(ft\.|feat\.|featuring|prod\.)\s.*$").expect("trailing credit pattern is valid")
});

static DISALLOWED_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-z0-9$!&?.'\- ]").expect("character filter pattern is valid")
});

/// Reduce a title, artist or album name to the form both catalogs are compared in.
///
/// Accents are transliterated, case folded, featuring/producer credits and version
/// markers ("remastered", "radio edit", ...) dropped, and anything outside a small
/// ASCII set removed.
pub fn simplify(input: &str) -> String {
    let mut result = unaccent(input).to_lowercase();
    for separator in SEPARATORS {
        result = result.replace(separator, " ");
    }
    let result = VERSION_MARKERS.replace_all(&result, "");
    let result = BRACKETED_CREDITS.replace_all(&result, "");
    let result = TRAILING_CREDITS.replace_all(&result, "");
    let result = DISALLOWED_CHARS.replace_all(&result, "");

    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Jaro-Winkler similarity between two strings, 1.0 for identical input.
pub fn jaro_winkler_similarity(s1: &str, s2: &str) -> f64 {
    if s1 == s2 {
        return 1.0;
    }
    if s1.is_empty() || s2.is_empty() {
        return 0.0;
    }
    jaro_winkler::jaro_winkler(s1, s2)
}

/// Token-based similarity - handles word reordering
///
/// "daft punk" vs "punk daft" scores 1.0
pub fn token_similarity(s1: &str, s2: &str) -> f64 {
    let tokens1: HashSet<&str> = s1.split_whitespace().collect();
    let tokens2: HashSet<&str> = s2.split_whitespace().collect();

    if tokens1.is_empty() && tokens2.is_empty() {
        return 1.0;
    }
    if tokens1.is_empty() || tokens2.is_empty() {
        return 0.0;
    }

    let intersection = tokens1.intersection(&tokens2).count();
    let union = tokens1.union(&tokens2).count();

    intersection as f64 / union as f64
}

/// Combined similarity using both Jaro-Winkler and token-based
pub fn combined_similarity(s1: &str, s2: &str) -> f64 {
    let jw = jaro_winkler_similarity(s1, s2);
    let token = token_similarity(s1, s2);

    jw.max(token * 0.95)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simplify_basic() {
        assert_eq!(simplify("Hello World"), "hello world");
        assert_eq!(simplify("  Multiple   Spaces  "), "multiple spaces");
        assert_eq!(simplify("Don't Stop Me Now"), "don't stop me now");
    }

    #[test]
    fn test_simplify_transliterates_accents() {
        assert_eq!(simplify("Beyoncé"), "beyonce");
        assert_eq!(simplify("Sigur Rós"), "sigur ros");
    }

    #[test]
    fn test_simplify_drops_version_markers() {
        assert_eq!(simplify("Bohemian Rhapsody - Remastered 2011"), "bohemian rhapsody 2011");
        assert_eq!(simplify("Strobe (Radio Edit)"), "strobe");
        assert_eq!(simplify("Opus (Extended Mix)"), "opus");
    }

    #[test]
    fn test_simplify_drops_featuring_credits() {
        assert_eq!(simplify("Get Lucky (feat. Pharrell Williams)"), "get lucky");
        assert_eq!(simplify("Stay [ft. Justin Bieber]"), "stay");
        assert_eq!(simplify("Closer feat. Halsey"), "closer");
        assert_eq!(simplify("Song (with Someone Else)"), "song");
    }

    #[test]
    fn test_simplify_collapses_separators() {
        assert_eq!(simplify("Artist A x Artist B"), "artist a artist b");
        assert_eq!(simplify("Alpha vs Omega"), "alpha omega");
    }

    #[test]
    fn test_simplify_keeps_allowed_punctuation() {
        assert_eq!(simplify("Ke$ha"), "ke$ha");
        assert_eq!(simplify("P!nk"), "p!nk");
        assert_eq!(simplify("Who? (Live)"), "who? live");
    }

    #[test]
    fn test_jaro_winkler() {
        assert!((jaro_winkler_similarity("hello", "hello") - 1.0).abs() < 0.001);
        assert!(jaro_winkler_similarity("hello", "hallo") > 0.8);
        assert!(jaro_winkler_similarity("hello", "world") < 0.5);
        assert_eq!(jaro_winkler_similarity("", "hello"), 0.0);
    }

    #[test]
    fn test_token_similarity() {
        assert!((token_similarity("quick brown fox", "brown fox quick") - 1.0).abs() < 0.001);
        assert!((token_similarity("a b", "a c") - 1.0 / 3.0).abs() < 0.001);
        assert_eq!(token_similarity("", "song"), 0.0);
    }

    #[test]
    fn test_combined_similarity_prefers_better_signal() {
        let reordered = combined_similarity("punk daft", "daft punk");
        assert!(reordered >= 0.95 - 1e-9);
        assert!(combined_similarity("song a", "song b") > 0.8);
    }
}
