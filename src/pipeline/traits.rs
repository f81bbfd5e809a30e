use std::path::Path;

use candle_core::{Device, Tensor};

use crate::config::DecodeConfig;
use crate::error::EditError;
use crate::types::{FrameSpan, TokenStream, Waveform};

/// Text to phoneme symbols. Normalization is up to the implementation.
pub trait Phonemizer: Send + Sync {
    fn phonemize(&self, text: &str) -> Result<Vec<String>, EditError>;
}

/// Codec output for one audio file.
#[derive(Debug, Clone)]
pub struct AudioEncoding {
    pub codes: TokenStream,
    /// Handed back unchanged to decode.
    pub scale: Option<Tensor>,
    pub embedding: Option<Tensor>,
}

pub trait AudioCodec: Send + Sync {
    fn sample_rate_hz(&self) -> u32;

    fn encode(&self, audio_path: &Path, device: &Device) -> Result<AudioEncoding, EditError>;

    fn decode(&self, frames: &TokenStream, scale: Option<&Tensor>) -> Result<Waveform, EditError>;

    /// Decodes `frames` while filling the zeroed regions of `fill` and
    /// reconciling the watermark carried by `marks`.
    fn watermark_decode(
        &self,
        frames: &TokenStream,
        marks: &Tensor,
        fill: &Waveform,
        scale: Option<&Tensor>,
    ) -> Result<Waveform, EditError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingConfig {
    pub top_k: usize,
    pub top_p: f64,
    pub temperature: f64,
    pub stop_repetition: i64,
    pub kvcache: bool,
}

impl From<&DecodeConfig> for SamplingConfig {
    fn from(config: &DecodeConfig) -> Self {
        Self {
            top_k: config.top_k,
            top_p: config.top_p,
            temperature: config.temperature,
            stop_repetition: config.stop_repetition,
            kvcache: config.kvcache,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuidanceConfig {
    pub cfg_coef: f64,
    pub cfg_stride: usize,
}

/// Inputs for one masked generation call. Tensors already live on the
/// editor's device.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// `[1, L]` u32 phoneme ids of the target text.
    pub text_tokens: Tensor,
    /// `[1]` u32.
    pub text_tokens_lens: Tensor,
    pub prompt_text_tokens: Tensor,
    pub prompt_text_tokens_lens: Tensor,
    /// `[1, T, K]` codes of the source audio.
    pub audio_prompt: Tensor,
    /// Same codes as `audio_prompt`, read as context around the masked region.
    pub masked_context: Tensor,
    /// `[1, 1, 2]` i64 frame interval.
    pub mask_interval: Tensor,
    pub sampling: SamplingConfig,
    pub guidance: GuidanceConfig,
    pub aug_text: bool,
    pub aug_context: bool,
}

/// Result of masked generation.
///
/// `masks[i]` is where, in the generated timeline, the source frames
/// `preserved[i]` belong. Both lists have the same length.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    pub frames: TokenStream,
    pub marks: Tensor,
    pub masks: Vec<FrameSpan>,
    pub preserved: Vec<FrameSpan>,
}

pub trait MaskedGenerator: Send + Sync {
    fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutput, EditError>;
}
