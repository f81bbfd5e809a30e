use std::path::Path;

use candle_core::{DType, Device, Tensor};

use crate::audio::{load_waveform, pad_to_multiple};
use crate::error::EditError;
use crate::pipeline::traits::{AudioCodec, GenerationOutput};
use crate::types::{FrameSpan, Waveform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconstructionMode {
    pub use_watermark: bool,
    pub tts: bool,
}

pub(crate) struct Reconstructor<'a> {
    pub codec: &'a dyn AudioCodec,
    pub samples_per_frame: usize,
    pub device: &'a Device,
}

impl Reconstructor<'_> {
    pub(crate) fn reconstruct(
        &self,
        output: &GenerationOutput,
        scale: Option<&Tensor>,
        audio_path: &Path,
        mode: ReconstructionMode,
    ) -> Result<Waveform, EditError> {
        let decoded = if mode.use_watermark {
            let source = load_waveform(audio_path, self.device)?;
            if source.sample_rate_hz() != self.codec.sample_rate_hz() {
                tracing::warn!(
                    source_rate_hz = source.sample_rate_hz(),
                    codec_rate_hz = self.codec.sample_rate_hz(),
                    "source audio sample rate differs from the codec rate; splice boundaries may drift"
                );
            }
            let padded = pad_to_multiple(source.samples(), self.samples_per_frame)?;
            let fill = splice_preserved(
                &padded,
                output.frames.n_frames(),
                &output.masks,
                &output.preserved,
                self.samples_per_frame,
            )?;
            let fill = Waveform::new(fill, source.sample_rate_hz())?;
            self.codec
                .watermark_decode(&output.frames, &output.marks, &fill, scale)?
        } else {
            self.codec.decode(&output.frames, scale)?
        };

        if mode.tts {
            trim_tts_lead(decoded, &output.masks, self.samples_per_frame)
        } else {
            Ok(decoded)
        }
    }
}

/// Builds a `(channels, n_frames * samples_per_frame)` buffer holding the
/// preserved source audio at its new positions. Everything else is zero.
///
/// For each `i`, samples `preserved[i] * samples_per_frame` of `source` are
/// copied to `masks[i] * samples_per_frame` of the new buffer. Negative span
/// starts are clamped to zero.
pub fn splice_preserved(
    source: &Tensor,
    n_frames: usize,
    masks: &[FrameSpan],
    preserved: &[FrameSpan],
    samples_per_frame: usize,
) -> Result<Tensor, EditError> {
    if masks.len() != preserved.len() {
        return Err(EditError::reconstruction_range(format!(
            "{} mask spans but {} preserved spans",
            masks.len(),
            preserved.len()
        )));
    }
    let (channels, source_len) = source
        .dims2()
        .map_err(|e| EditError::runtime("source waveform dims", e))?;
    let dest_len = n_frames * samples_per_frame;
    let mut dest = Tensor::zeros((channels, dest_len), DType::F32, source.device())
        .map_err(|e| EditError::runtime("allocate splice buffer", e))?;
    let source = source
        .to_dtype(DType::F32)
        .map_err(|e| EditError::runtime("source waveform dtype", e))?;

    for (idx, (dst_span, src_span)) in masks.iter().zip(preserved).enumerate() {
        let (dst_start, dst_end) = sample_range(*dst_span, samples_per_frame, idx, "mask")?;
        let (src_start, src_end) = sample_range(*src_span, samples_per_frame, idx, "preserved")?;
        if src_end > source_len {
            return Err(EditError::reconstruction_range(format!(
                "preserved span {idx} needs source samples [{src_start}, {src_end}) but the padded source has {source_len}"
            )));
        }
        if dst_end > dest_len {
            return Err(EditError::reconstruction_range(format!(
                "mask span {idx} writes samples [{dst_start}, {dst_end}) past the {dest_len}-sample output"
            )));
        }
        let len = src_end - src_start;
        if dst_end - dst_start != len {
            return Err(EditError::reconstruction_range(format!(
                "span {idx}: {len} source samples cannot fill {} destination samples",
                dst_end - dst_start
            )));
        }
        if len == 0 || channels == 0 {
            continue;
        }
        tracing::debug!(
            span = idx,
            src_start,
            src_end,
            dst_start,
            dst_end,
            "splicing preserved audio"
        );
        let chunk = source
            .narrow(1, src_start, len)
            .map_err(|e| EditError::runtime("slice source waveform", e))?;
        dest = dest
            .slice_assign(&[0..channels, dst_start..dst_end], &chunk)
            .map_err(|e| EditError::runtime("splice preserved audio", e))?;
    }
    Ok(dest)
}

fn sample_range(
    span: FrameSpan,
    samples_per_frame: usize,
    idx: usize,
    which: &str,
) -> Result<(usize, usize), EditError> {
    let span = span.clamped();
    if span.end < span.start {
        return Err(EditError::reconstruction_range(format!(
            "{which} span {idx} ({}, {}) ends before it starts",
            span.start, span.end
        )));
    }
    // Both bounds are non-negative here.
    Ok((
        span.start as usize * samples_per_frame,
        span.end as usize * samples_per_frame,
    ))
}

/// Drops every sample before the end of the first mask span.
pub fn trim_tts_lead(
    waveform: Waveform,
    masks: &[FrameSpan],
    samples_per_frame: usize,
) -> Result<Waveform, EditError> {
    let first = masks.first().ok_or_else(|| {
        EditError::reconstruction_range("tts trim needs at least one mask span")
    })?;
    if first.end < 0 {
        return Err(EditError::reconstruction_range(format!(
            "tts trim point {} is negative",
            first.end
        )));
    }
    let cut = first.end as usize * samples_per_frame;
    let len = waveform.len();
    if cut > len {
        return Err(EditError::reconstruction_range(format!(
            "tts trim point {cut} is past the {len}-sample decoded waveform"
        )));
    }
    let sample_rate_hz = waveform.sample_rate_hz();
    let trimmed = waveform
        .samples()
        .narrow(1, cut, len - cut)
        .map_err(|e| EditError::runtime("trim tts lead", e))?;
    Waveform::new(trimmed, sample_rate_hz)
}
