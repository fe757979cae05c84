use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{HashMap, HashSet};

lazy_static! {
    // Compiled once; every worker shares the same matcher.
    static ref STRIP: Regex =
        Regex::new(r#"[,'.;:?!—\-()\[\]{}"/\\%&*+=<>\n\t\r]"#).expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","an","and","are","as","at","be","but","by","for","from","in","is","it","of","on","or",
            "that","the","this","to","was","were","will","with",
            "i","you","he","she","we","they","me","him","her","us","them",
            "my","your","his","its","our","their",
            "am","been","being","have","has","had","do","does","did","shall","should","would","could",
            "about","against","between","into","through","during","before","after","above","below",
            "up","down","out","off","over","under","again","further","then","once",
            "here","there","when","where","why","how",
            "all","any","both","each","few","more","most","other","some","such",
            "no","nor","not","only","own","same","so","than","too","very",
            "can","just","don","now"
        ];
        words.iter().copied().collect()
    };
}

/// Strip punctuation and control whitespace, then replace each pair of
/// spaces with a single space.
///
/// The collapse is a single left-to-right pass over non-overlapping pairs, so
/// three spaces become two and four become two. Callers that need tokens
/// split on whitespace anyway, which makes the leftovers harmless.
pub fn normalize(text: &str) -> String {
    let cleaned = STRIP.replace_all(text, "");
    cleaned.replace("  ", " ")
}

/// Case-insensitive membership test against the document-side stopword list.
pub fn is_stopword(token: &str) -> bool {
    if STOPWORDS.contains(token) {
        return true;
    }
    token.chars().any(char::is_uppercase) && STOPWORDS.contains(token.to_lowercase().as_str())
}

/// Split already-normalized text on whitespace, lowercase, drop stopwords.
pub fn tokenize(normalized: &str) -> Vec<String> {
    normalized
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|t| !is_stopword(t))
        .collect()
}

/// Count every surviving token of the normalized text.
pub fn term_frequencies(normalized: &str) -> HashMap<String, u32> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for token in tokenize(normalized) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_class() {
        assert_eq!(normalize("Paul's (Muad'Dib) \"Kwisatz-Haderach\"!"), "Pauls MuadDib KwisatzHaderach");
        assert_eq!(normalize("a/b\\c%d&e*f+g=h<i>j[k]l{m}n"), "abcdefghijklmn");
        assert_eq!(normalize("spice—melange; desert: dune?"), "spicemelange desert dune");
    }

    #[test]
    fn removes_control_whitespace() {
        assert_eq!(normalize("line\none\ttab\r"), "lineonetab");
    }

    #[test]
    fn collapses_only_pairs_of_spaces() {
        assert_eq!(normalize("a  b"), "a b");
        assert_eq!(normalize("a   b"), "a  b");
        assert_eq!(normalize("a    b"), "a  b");
        // removal happens before collapsing
        assert_eq!(normalize("a , b"), "a b");
    }

    #[test]
    fn stopwords_ignore_case() {
        assert!(is_stopword("the"));
        assert!(is_stopword("The"));
        assert!(is_stopword("THEIR"));
        assert!(!is_stopword("sandworm"));
    }

    #[test]
    fn tokenize_lowercases_and_filters() {
        let t = tokenize("The Spice must FLOW and the spice");
        assert_eq!(t, vec!["spice", "must", "flow", "spice"]);
    }

    #[test]
    fn counts_surviving_terms() {
        let counts = term_frequencies(&normalize("Sandtrout are Sandtrout."));
        assert_eq!(counts.len(), 1);
        assert_eq!(counts["sandtrout"], 2);
    }

    #[test]
    fn punctuation_only_text_yields_nothing() {
        assert!(term_frequencies(&normalize("?! -- (...) ;")).is_empty());
    }
}
