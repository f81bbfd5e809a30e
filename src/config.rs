use std::path::Path;

use serde::Deserialize;

use crate::error::EditError;
use crate::phonemes::UnknownPhonemePolicy;

/// Sampling and codec-timing options handed to masked generation and decode.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Codec frame rate in frames per second.
    pub codec_sr: f64,
    /// Raw audio samples per codec frame. Shared by padding, splicing and trimming.
    pub samples_per_frame: usize,
    pub top_k: usize,
    pub top_p: f64,
    pub temperature: f64,
    pub stop_repetition: i64,
    pub kvcache: bool,
}

impl DecodeConfig {
    pub const DEFAULT_CODEC_SR: f64 = 50.0;
    pub const DEFAULT_SAMPLES_PER_FRAME: usize = 320;

    pub fn validate(&self) -> Result<(), EditError> {
        if !(self.codec_sr.is_finite() && self.codec_sr > 0.0) {
            return Err(EditError::invalid_input(format!(
                "codec_sr must be a positive frame rate, got {}",
                self.codec_sr
            )));
        }
        if self.samples_per_frame == 0 {
            return Err(EditError::invalid_input("samples_per_frame must be non-zero"));
        }
        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(EditError::invalid_input(format!(
                "top_p must be in (0, 1], got {}",
                self.top_p
            )));
        }
        if !(self.temperature > 0.0) {
            return Err(EditError::invalid_input(format!(
                "temperature must be positive, got {}",
                self.temperature
            )));
        }
        Ok(())
    }

    /// Sample rate implied by the frame rate and frame hop.
    pub fn implied_sample_rate_hz(&self) -> f64 {
        self.codec_sr * self.samples_per_frame as f64
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            codec_sr: Self::DEFAULT_CODEC_SR,
            samples_per_frame: Self::DEFAULT_SAMPLES_PER_FRAME,
            top_k: 0,
            top_p: 0.8,
            temperature: 1.0,
            stop_repetition: 3,
            kvcache: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelArgs {
    pub n_codebooks: usize,
}

impl ModelArgs {
    pub fn validate(&self) -> Result<(), EditError> {
        if self.n_codebooks == 0 {
            return Err(EditError::invalid_input("n_codebooks must be non-zero"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EditConfig {
    #[serde(default = "default_device")]
    pub device: String,
    #[serde(default)]
    pub decode: DecodeConfig,
    pub model: ModelArgs,
    #[serde(default = "default_cfg_coef")]
    pub cfg_coef: f64,
    #[serde(default = "default_cfg_stride")]
    pub cfg_stride: usize,
    #[serde(default)]
    pub aug_text: bool,
    #[serde(default)]
    pub aug_context: bool,
    #[serde(default)]
    pub use_watermark: bool,
    #[serde(default)]
    pub tts: bool,
    #[serde(default)]
    pub unknown_phonemes: UnknownPhonemePolicy,
}

fn default_device() -> String {
    "cpu".to_string()
}
fn default_cfg_coef() -> f64 {
    1.0
}
fn default_cfg_stride() -> usize {
    1
}

impl EditConfig {
    pub fn new(model: ModelArgs) -> Self {
        Self {
            device: default_device(),
            decode: DecodeConfig::default(),
            model,
            cfg_coef: default_cfg_coef(),
            cfg_stride: default_cfg_stride(),
            aug_text: false,
            aug_context: false,
            use_watermark: false,
            tts: false,
            unknown_phonemes: UnknownPhonemePolicy::default(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, EditError> {
        let data =
            std::fs::read_to_string(path).map_err(|e| EditError::io("read edit config", e))?;
        let config: Self =
            serde_json::from_str(&data).map_err(|e| EditError::json("parse edit config", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EditError> {
        self.decode.validate()?;
        self.model.validate()?;
        if self.cfg_stride == 0 {
            return Err(EditError::invalid_input("cfg_stride must be non-zero"));
        }
        match self.device.as_str() {
            "cpu" | "cuda" => Ok(()),
            other => Err(EditError::invalid_input(format!(
                "unsupported device '{other}', expected 'cpu' or 'cuda'"
            ))),
        }
    }
}
