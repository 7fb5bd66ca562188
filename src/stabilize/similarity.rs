//! Fuzzy string similarity on a 0-100 scale.

/// Similarity ratio between two strings: 100 means identical, 0 means
/// nothing in common. Defined as `100 * (1 - levenshtein / max_len)` over
/// chars. Two empty strings are identical (100).
pub fn similarity_ratio(a: &str, b: &str) -> u32 {
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    let max_len = a_len.max(b_len);
    if max_len == 0 {
        return 100;
    }
    let distance = levenshtein(a, b);
    (100 * (max_len - distance) / max_len) as u32
}

/// Two-row Levenshtein over chars.
fn levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0usize; b_chars.len() + 1];

    for (i, &ac) in a_chars.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_chars.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b_chars.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_100() {
        assert_eq!(similarity_ratio("bom dia", "bom dia"), 100);
        assert_eq!(similarity_ratio("", ""), 100);
    }

    #[test]
    fn disjoint_strings_score_low() {
        assert!(similarity_ratio("abcdef", "uvwxyz") < 20);
        assert_eq!(similarity_ratio("abc", ""), 0);
    }

    #[test]
    fn near_matches_cross_the_default_threshold() {
        // One OCR character error in a typical phrase stays above 85.
        assert!(similarity_ratio("saida de emergencia", "saida de emergencla") >= 85);
        // A genuinely different phrase falls below it.
        assert!(similarity_ratio("saida de emergencia", "bom dia") < 85);
    }

    #[test]
    fn distance_handles_multibyte_chars() {
        assert_eq!(levenshtein("ônibus", "onibus"), 1);
        assert_eq!(similarity_ratio("ônibus", "ônibus"), 100);
    }

    #[test]
    fn ratio_is_symmetric() {
        assert_eq!(
            similarity_ratio("placa de pare", "placa du pare"),
            similarity_ratio("placa du pare", "placa de pare")
        );
    }
}
