use crate::alignment::span_to_interval;
use crate::config::DecodeConfig;
use crate::error::EditError;
use crate::types::{MaskInterval, TimeInterval, WordAlignmentRow, WordSpan};

/// Context added around an edited region before it is converted to frames.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MaskMargins {
    pub left_secs: f64,
    pub right_secs: f64,
}

/// Converts between seconds and codec frame indices at a fixed frame rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskConverter {
    codec_sr: f64,
}

impl MaskConverter {
    pub fn new(codec_sr: f64) -> Result<Self, EditError> {
        if !(codec_sr.is_finite() && codec_sr > 0.0) {
            return Err(EditError::invalid_input(format!(
                "codec_sr must be a positive frame rate, got {codec_sr}"
            )));
        }
        Ok(Self { codec_sr })
    }

    pub fn from_config(config: &DecodeConfig) -> Result<Self, EditError> {
        Self::new(config.codec_sr)
    }

    pub fn codec_sr(&self) -> f64 {
        self.codec_sr
    }

    pub fn frame_secs(&self) -> f64 {
        1.0 / self.codec_sr
    }

    pub fn to_mask(&self, interval: TimeInterval) -> Result<MaskInterval, EditError> {
        check_interval(interval)?;
        Ok(MaskInterval {
            start_frame: (interval.start_secs * self.codec_sr).round() as usize,
            end_frame: (interval.end_secs * self.codec_sr).round() as usize,
        })
    }

    pub fn to_time(&self, mask: MaskInterval) -> TimeInterval {
        TimeInterval {
            start_secs: mask.start_frame as f64 / self.codec_sr,
            end_secs: mask.end_frame as f64 / self.codec_sr,
        }
    }

    /// Widens `interval` by `margins`, keeping the start at least one frame in
    /// and the end within `audio_duration_secs`.
    pub fn widen(
        &self,
        interval: TimeInterval,
        margins: MaskMargins,
        audio_duration_secs: f64,
    ) -> Result<TimeInterval, EditError> {
        check_interval(interval)?;
        if margins.left_secs < 0.0 || margins.right_secs < 0.0 {
            return Err(EditError::invalid_input(format!(
                "mask margins must be non-negative, got ({}, {})",
                margins.left_secs, margins.right_secs
            )));
        }
        let start_secs = (interval.start_secs - margins.left_secs).max(self.frame_secs());
        let end_secs = (interval.end_secs + margins.right_secs).min(audio_duration_secs);
        let widened = TimeInterval {
            start_secs,
            end_secs,
        };
        check_interval(widened)?;
        Ok(widened)
    }

    /// Word span straight to a frame mask.
    pub fn mask_for_span(
        &self,
        words: &[WordAlignmentRow],
        span: WordSpan,
    ) -> Result<MaskInterval, EditError> {
        let interval = span_to_interval(words, span)?;
        self.to_mask(interval)
    }
}

fn check_interval(interval: TimeInterval) -> Result<(), EditError> {
    let TimeInterval {
        start_secs,
        end_secs,
    } = interval;
    if !start_secs.is_finite() || !end_secs.is_finite() || start_secs < 0.0 {
        return Err(EditError::invalid_input(format!(
            "time interval ({start_secs}, {end_secs}) must be finite and non-negative"
        )));
    }
    if start_secs > end_secs {
        return Err(EditError::invalid_input(format!(
            "time interval start {start_secs} is after end {end_secs}"
        )));
    }
    Ok(())
}
