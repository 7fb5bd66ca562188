//! OCR capability surface and phrase assembly.
//!
//! The OCR engine itself lives behind `TextExtractor`; this module turns its
//! per-line word fragments into the single raw string the text stabilizer
//! consumes: optional spell correction per word, a meaningfulness filter per
//! phrase, words joined with spaces, phrases joined with " | ".

use anyhow::Result;

use crate::frame::Frame;

/// One detected text line, as ordered word fragments.
pub type TextLine = Vec<String>;

/// OCR engine capability: given a frame, produce detected text lines.
pub trait TextExtractor: Send {
    fn extract(&mut self, frame: &Frame) -> Result<Vec<TextLine>>;
}

/// Extractor that never detects text. Used when no OCR engine is wired in.
pub struct NoopExtractor;

impl TextExtractor for NoopExtractor {
    fn extract(&mut self, _frame: &Frame) -> Result<Vec<TextLine>> {
        Ok(Vec::new())
    }
}

/// Spell-correction capability, applied per word when enabled.
pub trait SpellCorrector: Send {
    /// Returns the corrected word, or `None` when no correction is known
    /// (the original word is kept).
    fn correct(&self, word: &str) -> Option<String>;
}

/// Corrector that never corrects.
pub struct NoopCorrector;

impl SpellCorrector for NoopCorrector {
    fn correct(&self, _word: &str) -> Option<String> {
        None
    }
}

/// Phrase meaningfulness predicate: at least `min_words` words with an
/// average word length of at least `min_avg_word_len` chars. Filters
/// single-character OCR garbage before it reaches the stabilizer.
pub fn is_text_meaningful(words: &[String], min_words: usize, min_avg_word_len: f64) -> bool {
    if words.is_empty() || words.len() < min_words {
        return false;
    }
    let total_len: usize = words.iter().map(|w| w.chars().count()).sum();
    let avg = total_len as f64 / words.len() as f64;
    avg >= min_avg_word_len
}

/// Assemble extracted lines into the raw text fed to the stabilizer.
/// Returns the empty string when no phrase survives the filter.
pub fn assemble_phrases(
    lines: Vec<TextLine>,
    corrector: Option<&dyn SpellCorrector>,
    min_words: usize,
    min_avg_word_len: f64,
) -> String {
    let mut phrases = Vec::new();
    for line in lines {
        let words: Vec<String> = match corrector {
            Some(corrector) => line
                .into_iter()
                .map(|word| corrector.correct(&word).unwrap_or(word))
                .collect(),
            None => line,
        };
        if is_text_meaningful(&words, min_words, min_avg_word_len) {
            phrases.push(words.join(" "));
        }
    }
    phrases.join(" | ")
}
