use crate::error::EditError;
use crate::pipeline::traits::Phonemizer;

/// Treats the input as already phonemized, one symbol per whitespace-separated item.
pub struct PassthroughPhonemizer;

impl Phonemizer for PassthroughPhonemizer {
    fn phonemize(&self, text: &str) -> Result<Vec<String>, EditError> {
        Ok(text.split_whitespace().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_splits_on_whitespace() {
        let phonemes = PassthroughPhonemizer.phonemize("  h ɛ  l oʊ \n").unwrap();
        assert_eq!(phonemes, ["h", "ɛ", "l", "oʊ"]);
    }

    #[test]
    fn passthrough_empty_text() {
        assert!(PassthroughPhonemizer.phonemize("   ").unwrap().is_empty());
    }
}
