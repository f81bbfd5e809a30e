use std::time::{Duration, Instant};

use candle_core::{Device, Tensor};

use crate::config::EditConfig;
use crate::error::EditError;
use crate::phonemes::PhonemeVocab;
use crate::pipeline::reconstruction::{ReconstructionMode, Reconstructor};
use crate::pipeline::traits::{
    AudioCodec, GenerationRequest, GuidanceConfig, MaskedGenerator, Phonemizer, SamplingConfig,
};
use crate::types::{EditRequest, MaskInterval, TokenStream, Waveform};

/// Runs one speech-edit or TTS request end to end.
pub struct SpeechEditor {
    config: EditConfig,
    device: Device,
    vocab: PhonemeVocab,
    phonemizer: Box<dyn Phonemizer>,
    codec: Box<dyn AudioCodec>,
    generator: Box<dyn MaskedGenerator>,
}

pub(crate) struct SpeechEditorParts {
    pub config: EditConfig,
    pub device: Device,
    pub vocab: PhonemeVocab,
    pub phonemizer: Box<dyn Phonemizer>,
    pub codec: Box<dyn AudioCodec>,
    pub generator: Box<dyn MaskedGenerator>,
}

impl SpeechEditor {
    pub(crate) fn from_parts(parts: SpeechEditorParts) -> Self {
        Self {
            config: parts.config,
            device: parts.device,
            vocab: parts.vocab,
            phonemizer: parts.phonemizer,
            codec: parts.codec,
            generator: parts.generator,
        }
    }

    pub fn config(&self) -> &EditConfig {
        &self.config
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn edit(&self, request: &EditRequest) -> Result<Waveform, EditError> {
        if request.mask.start_frame > request.mask.end_frame {
            return Err(EditError::invalid_input(format!(
                "mask interval ({}, {}) starts after it ends",
                request.mask.start_frame, request.mask.end_frame
            )));
        }

        let text_tokens = self.tokenize_text(&request.target_text, "target")?;
        if text_tokens.is_empty() {
            tracing::warn!("target text produced no phoneme tokens; generating anyway");
        }
        let prompt_tokens = self.tokenize_text(&request.prompt_text, "prompt")?;

        let encoding = self.codec.encode(&request.audio_path, &self.device)?;
        self.check_audio_codes(&encoding.codes)?;
        let codec_sr = self.config.decode.codec_sr;
        tracing::info!(
            frames = encoding.codes.n_frames(),
            secs = encoding.codes.n_frames() as f64 / codec_sr,
            "encoded source audio"
        );

        let generation_request = self.build_generation_request(
            &text_tokens,
            &prompt_tokens,
            &encoding.codes,
            request.mask,
        )?;

        let started = Instant::now();
        let output = self.generator.generate(&generation_request)?;
        tracing::info!(
            elapsed_ms = duration_to_ms(started.elapsed()),
            "masked generation finished"
        );
        tracing::info!(
            frames = output.frames.n_frames(),
            secs = output.frames.n_frames() as f64 / codec_sr,
            spans = output.masks.len(),
            "generated codes"
        );

        let reconstructor = Reconstructor {
            codec: self.codec.as_ref(),
            samples_per_frame: self.config.decode.samples_per_frame,
            device: &self.device,
        };
        reconstructor.reconstruct(
            &output,
            encoding.scale.as_ref(),
            &request.audio_path,
            ReconstructionMode {
                use_watermark: self.config.use_watermark,
                tts: self.config.tts,
            },
        )
    }

    fn tokenize_text(&self, text: &str, which: &'static str) -> Result<Vec<u32>, EditError> {
        let phonemes = self.phonemizer.phonemize(text.trim())?;
        let encoded = self.vocab.encode(&phonemes, self.config.unknown_phonemes)?;
        if encoded.dropped > 0 {
            tracing::debug!(
                text = which,
                dropped = encoded.dropped,
                kept = encoded.ids.len(),
                "dropped phonemes missing from the vocabulary"
            );
        }
        Ok(encoded.ids)
    }

    fn check_audio_codes(&self, codes: &TokenStream) -> Result<(), EditError> {
        let n_codebooks = self.config.model.n_codebooks;
        if codes.n_codebooks() != n_codebooks {
            return Err(EditError::shape_mismatch(
                "source audio codes",
                format!("[1, {n_codebooks}, T]"),
                codes.codes().dims(),
            ));
        }
        Ok(())
    }

    fn build_generation_request(
        &self,
        text_tokens: &[u32],
        prompt_tokens: &[u32],
        codes: &TokenStream,
        mask: MaskInterval,
    ) -> Result<GenerationRequest, EditError> {
        let (text_tokens, text_tokens_lens) = self.token_tensors(text_tokens)?;
        let (prompt_text_tokens, prompt_text_tokens_lens) = self.token_tensors(prompt_tokens)?;
        let audio = codes
            .frame_major()
            .and_then(|t| t.to_device(&self.device))
            .map_err(|e| EditError::runtime("prepare audio codes", e))?;
        let mask_interval = mask
            .to_tensor(&self.device)
            .map_err(|e| EditError::runtime("prepare mask interval", e))?;

        Ok(GenerationRequest {
            text_tokens,
            text_tokens_lens,
            prompt_text_tokens,
            prompt_text_tokens_lens,
            audio_prompt: audio.clone(),
            masked_context: audio,
            mask_interval,
            sampling: SamplingConfig::from(&self.config.decode),
            guidance: GuidanceConfig {
                cfg_coef: self.config.cfg_coef,
                cfg_stride: self.config.cfg_stride,
            },
            aug_text: self.config.aug_text,
            aug_context: self.config.aug_context,
        })
    }

    fn token_tensors(&self, ids: &[u32]) -> Result<(Tensor, Tensor), EditError> {
        let tokens = Tensor::from_vec(ids.to_vec(), (1, ids.len()), &self.device)
            .map_err(|e| EditError::runtime("token tensor", e))?;
        let lens = Tensor::new(&[ids.len() as u32], &self.device)
            .map_err(|e| EditError::runtime("token length tensor", e))?;
        Ok((tokens, lens))
    }
}

fn duration_to_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
