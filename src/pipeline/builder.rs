use std::path::Path;

use candle_core::Device;

use crate::config::EditConfig;
use crate::error::EditError;
use crate::phonemes::PhonemeVocab;
use crate::pipeline::defaults::PassthroughPhonemizer;
use crate::pipeline::runtime::{SpeechEditor, SpeechEditorParts};
use crate::pipeline::traits::{AudioCodec, MaskedGenerator, Phonemizer};

pub struct SpeechEditorBuilder {
    config: EditConfig,
    vocab: Option<PhonemeVocab>,
    phonemizer: Option<Box<dyn Phonemizer>>,
    codec: Option<Box<dyn AudioCodec>>,
    generator: Option<Box<dyn MaskedGenerator>>,
}

impl SpeechEditorBuilder {
    pub fn new(config: EditConfig) -> Self {
        Self {
            config,
            vocab: None,
            phonemizer: None,
            codec: None,
            generator: None,
        }
    }

    pub fn with_vocab(mut self, vocab: PhonemeVocab) -> Self {
        self.vocab = Some(vocab);
        self
    }

    /// Loads a `.json` vocabulary, or an `<id> <phoneme>` text file otherwise.
    pub fn with_vocab_path(mut self, path: &Path) -> Result<Self, EditError> {
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let vocab = if is_json {
            PhonemeVocab::load_json(path)?
        } else {
            PhonemeVocab::load_text(path)?
        };
        self.vocab = Some(vocab);
        Ok(self)
    }

    pub fn with_phonemizer(mut self, phonemizer: Box<dyn Phonemizer>) -> Self {
        self.phonemizer = Some(phonemizer);
        self
    }

    pub fn with_codec(mut self, codec: Box<dyn AudioCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    pub fn with_generator(mut self, generator: Box<dyn MaskedGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn build(self) -> Result<SpeechEditor, EditError> {
        self.config.validate()?;
        let vocab = self
            .vocab
            .ok_or_else(|| EditError::invalid_input("a phoneme vocabulary is required"))?;
        let codec = self
            .codec
            .ok_or_else(|| EditError::invalid_input("an audio codec is required"))?;
        let generator = self
            .generator
            .ok_or_else(|| EditError::invalid_input("a masked generator is required"))?;
        if vocab.is_empty() {
            tracing::warn!("phoneme vocabulary is empty; every phoneme will be unknown");
        }

        let implied_rate_hz = self.config.decode.implied_sample_rate_hz();
        if (implied_rate_hz - codec.sample_rate_hz() as f64).abs() > f64::EPSILON {
            tracing::warn!(
                codec_rate_hz = codec.sample_rate_hz(),
                implied_rate_hz,
                codec_sr = self.config.decode.codec_sr,
                samples_per_frame = self.config.decode.samples_per_frame,
                "codec sample rate disagrees with codec_sr * samples_per_frame"
            );
        }

        let device = resolve_device(&self.config.device)?;
        tracing::info!(
            n_codebooks = self.config.model.n_codebooks,
            vocab = vocab.len(),
            ?device,
            "speech editor ready"
        );

        Ok(SpeechEditor::from_parts(SpeechEditorParts {
            config: self.config,
            device,
            vocab,
            phonemizer: self
                .phonemizer
                .unwrap_or_else(|| Box::new(PassthroughPhonemizer)),
            codec,
            generator,
        }))
    }
}

fn resolve_device(name: &str) -> Result<Device, EditError> {
    match name {
        "cuda" => Device::new_cuda(0).map_err(|e| EditError::runtime("CUDA init", e)),
        _ => Ok(Device::Cpu),
    }
}
