//! Hysteresis-based OCR text stabilizer.

use super::similarity::similarity_ratio;

/// Candidate-debounce filter for OCR text.
///
/// A new reading either supports the current candidate (when similar enough)
/// or replaces it. A candidate is only emitted after `stability_count`
/// supporting observations, and only when it differs meaningfully from what
/// was last emitted. When the scene goes blank after a publication, a single
/// empty string is emitted to signal "text left the scene".
///
/// Note the candidate keeps its first observed form while similar variants
/// merely increment its support count; what gets published is that tracked
/// form, exactly.
pub struct TextStabilizer {
    similarity_threshold: u32,
    stability_count: u32,
    candidate: String,
    support: u32,
    last_published: Option<String>,
}

impl TextStabilizer {
    pub fn new(similarity_threshold: u32, stability_count: u32) -> Self {
        Self {
            similarity_threshold,
            stability_count,
            candidate: String::new(),
            support: 0,
            last_published: None,
        }
    }

    /// Feed one cycle's raw text. Returns `Some` only on a cycle where a
    /// publish-worthy change is decided; the value may be the empty string.
    pub fn update(&mut self, raw_text: &str) -> Option<String> {
        let cleaned = normalize_whitespace(raw_text);

        if !cleaned.is_empty() {
            let supports_candidate = !self.candidate.is_empty()
                && similarity_ratio(&cleaned.to_lowercase(), &self.candidate.to_lowercase())
                    >= self.similarity_threshold;
            if supports_candidate {
                self.support += 1;
            } else {
                self.candidate = cleaned;
                self.support = 1;
            }
        } else if !self.candidate.is_empty() {
            self.candidate.clear();
            self.support = 0;
        }

        if !self.candidate.is_empty() && self.support >= self.stability_count {
            let differs_from_last = match &self.last_published {
                None => true,
                Some(last) => {
                    similarity_ratio(&self.candidate.to_lowercase(), &last.to_lowercase())
                        < self.similarity_threshold
                }
            };
            if differs_from_last {
                self.last_published = Some(self.candidate.clone());
                return Some(self.candidate.clone());
            }
        } else if self.candidate.is_empty() {
            if matches!(&self.last_published, Some(last) if !last.is_empty()) {
                self.last_published = Some(String::new());
                return Some(String::new());
            }
        }
        None
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stabilizer() -> TextStabilizer {
        TextStabilizer::new(85, 3)
    }

    #[test]
    fn emits_only_after_stability_count_observations() {
        let mut stab = stabilizer();
        assert_eq!(stab.update("bom dia"), None);
        assert_eq!(stab.update("bom dia"), None);
        assert_eq!(stab.update("bom dia"), Some("bom dia".to_string()));
    }

    #[test]
    fn repeating_a_published_text_emits_nothing_further() {
        let mut stab = stabilizer();
        for _ in 0..3 {
            stab.update("bom dia");
        }
        for _ in 0..10 {
            assert_eq!(stab.update("bom dia"), None);
        }
    }

    #[test]
    fn empty_input_after_publication_emits_one_empty_string() {
        let mut stab = stabilizer();
        for _ in 0..3 {
            stab.update("bom dia");
        }
        assert_eq!(stab.update(""), Some(String::new()));
        // Subsequent empty cycles stay silent.
        assert_eq!(stab.update(""), None);
        assert_eq!(stab.update(""), None);
    }

    #[test]
    fn empty_input_without_prior_publication_stays_silent() {
        let mut stab = stabilizer();
        assert_eq!(stab.update(""), None);
        assert_eq!(stab.update("bom dia"), None);
        assert_eq!(stab.update(""), None);
    }

    #[test]
    fn dissimilar_reading_resets_the_candidate() {
        let mut stab = stabilizer();
        stab.update("bom dia");
        stab.update("bom dia");
        // A different phrase restarts support from 1.
        assert_eq!(stab.update("saida de emergencia"), None);
        assert_eq!(stab.update("saida de emergencia"), None);
        assert_eq!(
            stab.update("saida de emergencia"),
            Some("saida de emergencia".to_string())
        );
    }

    #[test]
    fn similar_variants_support_the_first_observed_form() {
        let mut stab = stabilizer();
        stab.update("saida de emergencia");
        stab.update("saida de emergencla");
        // The candidate kept the first form; that is what gets published.
        assert_eq!(
            stab.update("saida de emergenc1a"),
            Some("saida de emergencia".to_string())
        );
    }

    #[test]
    fn near_identical_follow_up_text_is_not_republished() {
        let mut stab = stabilizer();
        for _ in 0..3 {
            stab.update("saida de emergencia");
        }
        // OCR jitter: same phrase with one bad character, seen repeatedly.
        // It stabilizes as a candidate but is too similar to the last
        // publication to resend.
        for _ in 0..5 {
            assert_eq!(stab.update("saida de emergencla"), None);
        }
    }

    #[test]
    fn republishes_after_scene_blank_and_return() {
        let mut stab = stabilizer();
        for _ in 0..3 {
            stab.update("bom dia");
        }
        assert_eq!(stab.update(""), Some(String::new()));
        // Same text coming back must be announced again: last published is
        // now the empty string, which it differs from.
        stab.update("bom dia");
        stab.update("bom dia");
        assert_eq!(stab.update("bom dia"), Some("bom dia".to_string()));
    }

    #[test]
    fn whitespace_noise_is_normalized_before_comparison() {
        let mut stab = stabilizer();
        stab.update("  bom   dia ");
        stab.update("bom dia");
        assert_eq!(stab.update("bom\tdia"), Some("bom dia".to_string()));
    }

    #[test]
    fn comparison_is_case_insensitive_but_output_keeps_case() {
        let mut stab = stabilizer();
        stab.update("Bom Dia");
        stab.update("BOM DIA");
        assert_eq!(stab.update("bom dia"), Some("Bom Dia".to_string()));
    }
}
