use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::EditError;

/// What to do with phonemes that have no id in the vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownPhonemePolicy {
    /// Skip them silently.
    #[default]
    Drop,
    /// Fail the request.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPhonemes {
    pub ids: Vec<u32>,
    pub dropped: usize,
}

#[derive(Debug, Clone, Default)]
pub struct PhonemeVocab {
    ids: HashMap<String, u32>,
}

impl PhonemeVocab {
    pub fn new(ids: HashMap<String, u32>) -> Self {
        Self { ids }
    }

    /// JSON object mapping phoneme to id.
    pub fn load_json(path: &Path) -> Result<Self, EditError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| EditError::io("read phoneme vocab", e))?;
        let ids: HashMap<String, u32> = serde_json::from_str(&data)
            .map_err(|e| EditError::json("parse phoneme vocab", e))?;
        Ok(Self { ids })
    }

    /// Text file with one `<id> <phoneme>` pair per line.
    pub fn load_text(path: &Path) -> Result<Self, EditError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| EditError::io("read phoneme vocab", e))?;
        Self::parse_text(&data)
    }

    pub fn parse_text(data: &str) -> Result<Self, EditError> {
        let mut ids = HashMap::new();
        for (line_idx, line) in data.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let Some((id, phoneme)) = line.split_once(' ') else {
                return Err(EditError::invalid_input(format!(
                    "phoneme vocab line {}: expected '<id> <phoneme>'",
                    line_idx + 1
                )));
            };
            let id: u32 = id.trim().parse().map_err(|_| {
                EditError::invalid_input(format!(
                    "phoneme vocab line {}: id '{id}' is not an integer",
                    line_idx + 1
                ))
            })?;
            ids.insert(phoneme.to_string(), id);
        }
        Ok(Self { ids })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn get(&self, phoneme: &str) -> Option<u32> {
        self.ids.get(phoneme).copied()
    }

    pub fn encode<S: AsRef<str>>(
        &self,
        phonemes: &[S],
        policy: UnknownPhonemePolicy,
    ) -> Result<EncodedPhonemes, EditError> {
        let mut ids = Vec::with_capacity(phonemes.len());
        let mut dropped = 0usize;
        for phoneme in phonemes {
            let phoneme = phoneme.as_ref();
            match (self.get(phoneme), policy) {
                (Some(id), _) => ids.push(id),
                (None, UnknownPhonemePolicy::Drop) => dropped += 1,
                (None, UnknownPhonemePolicy::Reject) => {
                    return Err(EditError::invalid_input(format!(
                        "phoneme '{phoneme}' is not in the vocabulary"
                    )));
                }
            }
        }
        Ok(EncodedPhonemes { ids, dropped })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> PhonemeVocab {
        PhonemeVocab::parse_text("0 _\n1 h\n2 ɛ\n3 l\n4 oʊ\n").expect("valid vocab")
    }

    #[test]
    fn parse_text_reads_id_phoneme_pairs() {
        let v = vocab();
        assert_eq!(v.len(), 5);
        assert_eq!(v.get("oʊ"), Some(4));
        assert_eq!(v.get("_"), Some(0));
    }

    #[test]
    fn parse_text_keeps_space_phoneme() {
        // the word separator is a literal space after the id
        let v = PhonemeVocab::parse_text("7  \n").unwrap();
        assert_eq!(v.get(" "), Some(7));
    }

    #[test]
    fn parse_text_rejects_bad_ids() {
        assert!(PhonemeVocab::parse_text("x h\n").is_err());
        assert!(PhonemeVocab::parse_text("12\n").is_err());
    }

    #[test]
    fn drop_policy_skips_unknown() {
        let encoded = vocab()
            .encode(&["h", "ɛ", "?", "l", "oʊ", "ŋ"], UnknownPhonemePolicy::Drop)
            .unwrap();
        assert_eq!(encoded.ids, vec![1, 2, 3, 4]);
        assert_eq!(encoded.dropped, 2);
    }

    #[test]
    fn drop_policy_can_produce_empty_sequence() {
        let encoded = vocab()
            .encode(&["x", "y"], UnknownPhonemePolicy::Drop)
            .unwrap();
        assert!(encoded.ids.is_empty());
        assert_eq!(encoded.dropped, 2);
    }

    #[test]
    fn reject_policy_names_unknown_phoneme() {
        let err = vocab()
            .encode(&["h", "ŋ"], UnknownPhonemePolicy::Reject)
            .unwrap_err();
        assert!(err.to_string().contains("'ŋ'"));
    }

    #[test]
    fn load_json_and_text_from_disk() {
        let dir = std::env::temp_dir();
        let json_path = dir.join("speech_edit_rs_vocab.json");
        let text_path = dir.join("speech_edit_rs_vocab.txt");
        std::fs::write(&json_path, r#"{"a": 1, "b": 2}"#).expect("write json vocab");
        std::fs::write(&text_path, "1 a\n2 b\n").expect("write text vocab");

        let from_json = PhonemeVocab::load_json(&json_path).unwrap();
        let from_text = PhonemeVocab::load_text(&text_path).unwrap();
        assert_eq!(from_json.get("b"), Some(2));
        assert_eq!(from_text.get("b"), Some(2));

        let _ = std::fs::remove_file(&json_path);
        let _ = std::fs::remove_file(&text_path);
    }

    #[test]
    fn load_json_missing_file_fails() {
        assert!(PhonemeVocab::load_json(Path::new("/nonexistent/vocab.json")).is_err());
    }
}
