//! Edit-distance similarity used by the fuzzy stage

use strsim::levenshtein;

/// Classic unit-cost Levenshtein distance, compared case-insensitively.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

/// `(max_len - distance) / max_len`, in `[0, 1]`.
///
/// Two empty strings are fully similar.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = levenshtein(&a, &b);
    (max_len - distance) as f64 / max_len as f64
}

/// Best similarity two strings of these lengths could reach. Used to skip
/// candidates before paying for the distance computation.
pub(crate) fn length_bound(len_a: usize, len_b: usize) -> f64 {
    let max_len = len_a.max(len_b);
    if max_len == 0 {
        return 1.0;
    }
    len_a.min(len_b) as f64 / max_len as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_basics() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("Python", "python"), 0);
        assert_eq!(levenshtein_distance("pyt hon", "python"), 1);
    }

    #[test]
    fn test_similarity_empty_strings() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("", "rust"), 0.0);
    }

    #[test]
    fn test_similarity_values() {
        assert_eq!(similarity("abcdefghij", "abcdefghXY"), 0.8);
        assert_eq!(similarity("abcdefghij", "abcdefgXYZ"), 0.7);
        assert_eq!(similarity("pyt hon", "python"), 6.0 / 7.0);
        assert_eq!(similarity("RUST", "rust"), 1.0);
    }

    #[test]
    fn test_similarity_counts_characters_not_bytes() {
        // "diseño" is 6 characters but 7 bytes
        assert_eq!(similarity("diseño", "diseno"), 5.0 / 6.0);
    }

    #[test]
    fn test_length_bound_is_an_upper_bound() {
        let pairs = [("node", "node.js"), ("go", "golang"), ("", "")];
        for (a, b) in pairs {
            let bound = length_bound(a.chars().count(), b.chars().count());
            assert!(similarity(a, b) <= bound);
        }
    }
}
