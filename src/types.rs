use std::path::PathBuf;

use candle_core::{DType, Device, Tensor};

use crate::error::EditError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Word,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordAlignmentRow {
    pub start_time: f64,
    pub end_time: f64,
    pub label: String,
    pub kind: RowKind,
}

/// Index pair over the word rows of an alignment table.
///
/// Signed so that out-of-range caller input can be represented and rejected
/// when the span is mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordSpan {
    pub start: i64,
    pub end: i64,
}

impl WordSpan {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeInterval {
    pub start_secs: f64,
    pub end_secs: f64,
}

impl TimeInterval {
    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }
}

/// Region of codec frames the model regenerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskInterval {
    pub start_frame: usize,
    pub end_frame: usize,
}

impl MaskInterval {
    /// `[1, 1, 2]` i64 tensor, one interval for one sample.
    pub(crate) fn to_tensor(self, device: &Device) -> candle_core::Result<Tensor> {
        Tensor::new(
            &[[[self.start_frame as i64, self.end_frame as i64]]],
            device,
        )
    }
}

/// Frame interval as reported by the model. The start may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSpan {
    pub start: i64,
    pub end: i64,
}

impl FrameSpan {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Clamps a negative start to zero.
    pub fn clamped(self) -> Self {
        Self {
            start: self.start.max(0),
            end: self.end,
        }
    }
}

/// Codec codes for one sample, laid out `[1, K, T]`.
#[derive(Debug, Clone)]
pub struct TokenStream {
    codes: Tensor,
}

impl TokenStream {
    pub fn new(codes: Tensor) -> Result<Self, EditError> {
        let dims = codes.dims();
        if dims.len() != 3 || dims[0] != 1 {
            return Err(EditError::shape_mismatch(
                "token stream",
                "[1, n_codebooks, n_frames]",
                dims,
            ));
        }
        Ok(Self { codes })
    }

    pub fn codes(&self) -> &Tensor {
        &self.codes
    }

    pub fn n_codebooks(&self) -> usize {
        self.codes.dims()[1]
    }

    pub fn n_frames(&self) -> usize {
        self.codes.dims()[2]
    }

    /// `[1, T, K]` view fed to the model.
    pub fn frame_major(&self) -> candle_core::Result<Tensor> {
        self.codes.transpose(1, 2)?.contiguous()
    }
}

/// Raw audio laid out `(channels, samples)`.
#[derive(Debug, Clone)]
pub struct Waveform {
    samples: Tensor,
    sample_rate_hz: u32,
}

impl Waveform {
    pub fn new(samples: Tensor, sample_rate_hz: u32) -> Result<Self, EditError> {
        if samples.rank() != 2 {
            return Err(EditError::shape_mismatch(
                "waveform",
                "[channels, samples]",
                samples.dims(),
            ));
        }
        let samples = samples
            .to_dtype(DType::F32)
            .map_err(|e| EditError::runtime("waveform dtype", e))?;
        Ok(Self {
            samples,
            sample_rate_hz,
        })
    }

    pub fn samples(&self) -> &Tensor {
        &self.samples
    }

    pub fn into_samples(self) -> Tensor {
        self.samples
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    pub fn channels(&self) -> usize {
        self.samples.dims()[0]
    }

    pub fn len(&self) -> usize {
        self.samples.dims()[1]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate_hz == 0 {
            return 0.0;
        }
        self.len() as f64 / self.sample_rate_hz as f64
    }

    pub fn to_vec2(&self) -> Result<Vec<Vec<f32>>, EditError> {
        self.samples
            .to_vec2::<f32>()
            .map_err(|e| EditError::runtime("waveform to_vec2", e))
    }
}

/// One speech-edit or TTS request.
#[derive(Debug, Clone)]
pub struct EditRequest {
    pub audio_path: PathBuf,
    pub prompt_text: String,
    pub target_text: String,
    pub mask: MaskInterval,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_stream_rejects_batched_codes() {
        let codes = Tensor::zeros((2, 4, 10), DType::U32, &Device::Cpu).unwrap();
        let err = TokenStream::new(codes).unwrap_err();
        assert!(matches!(err, EditError::ShapeMismatch { .. }));
    }

    #[test]
    fn token_stream_frame_major_swaps_axes() {
        let codes = Tensor::zeros((1, 4, 10), DType::U32, &Device::Cpu).unwrap();
        let stream = TokenStream::new(codes).unwrap();
        assert_eq!(stream.n_codebooks(), 4);
        assert_eq!(stream.n_frames(), 10);
        assert_eq!(stream.frame_major().unwrap().dims(), &[1, 10, 4]);
    }

    #[test]
    fn mask_interval_tensor_is_batched() {
        let mask = MaskInterval {
            start_frame: 3,
            end_frame: 9,
        };
        let t = mask.to_tensor(&Device::Cpu).unwrap();
        assert_eq!(t.dims(), &[1, 1, 2]);
        assert_eq!(t.flatten_all().unwrap().to_vec1::<i64>().unwrap(), vec![3, 9]);
    }

    #[test]
    fn frame_span_clamps_only_start() {
        assert_eq!(FrameSpan::new(-2, 5).clamped(), FrameSpan::new(0, 5));
        assert_eq!(FrameSpan::new(4, 5).clamped(), FrameSpan::new(4, 5));
    }

    #[test]
    fn waveform_requires_rank_two() {
        let flat = Tensor::zeros(16, DType::F32, &Device::Cpu).unwrap();
        assert!(Waveform::new(flat, 16_000).is_err());

        let wav = Tensor::zeros((1, 16_000), DType::F32, &Device::Cpu).unwrap();
        let wav = Waveform::new(wav, 16_000).unwrap();
        assert_eq!(wav.channels(), 1);
        assert!((wav.duration_secs() - 1.0).abs() < 1e-9);
    }
}
