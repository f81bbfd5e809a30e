use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use candle_core::{Device, Tensor, D};
use claxon::FlacReader;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::error::EditError;
use crate::types::Waveform;

/// Loads a WAV or FLAC file as a `(channels, samples)` waveform on `device`.
pub fn load_waveform(path: &Path, device: &Device) -> Result<Waveform, EditError> {
    let is_flac = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("flac"));
    let (channels, sample_rate_hz) = if is_flac {
        read_flac(path)?
    } else {
        read_wav(path)?
    };
    let samples = channels_to_tensor(channels, device)?;
    Waveform::new(samples, sample_rate_hz)
}

fn read_wav(path: &Path) -> Result<(Vec<Vec<f32>>, u32), EditError> {
    let mut reader =
        WavReader::open(path).map_err(|e| EditError::runtime("open wav", e))?;
    let spec = reader.spec();
    let n_channels = usize::from(spec.channels.max(1));
    let mut channels = vec![Vec::new(); n_channels];

    match spec.sample_format {
        SampleFormat::Float => {
            for (idx, sample) in reader.samples::<f32>().enumerate() {
                let value = sample.map_err(|e| EditError::runtime("decode wav", e))?;
                channels[idx % n_channels].push(value);
            }
        }
        SampleFormat::Int => {
            let max = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            for (idx, sample) in reader.samples::<i32>().enumerate() {
                let value = sample.map_err(|e| EditError::runtime("decode wav", e))?;
                channels[idx % n_channels].push(value as f32 / max);
            }
        }
    }
    Ok((channels, spec.sample_rate))
}

fn read_flac(path: &Path) -> Result<(Vec<Vec<f32>>, u32), EditError> {
    let file = File::open(path).map_err(|e| EditError::io("open flac", e))?;
    let mut reader = FlacReader::new(BufReader::new(file))
        .map_err(|e| EditError::runtime("read flac header", e))?;
    let info = reader.streaminfo();
    let n_channels = info.channels.max(1) as usize;
    let max = (1_i64 << (info.bits_per_sample - 1)) as f32;
    let mut channels = vec![Vec::new(); n_channels];
    for (idx, sample) in reader.samples().enumerate() {
        let value = sample.map_err(|e| EditError::runtime("decode flac", e))?;
        channels[idx % n_channels].push(value as f32 / max);
    }
    Ok((channels, info.sample_rate))
}

fn channels_to_tensor(channels: Vec<Vec<f32>>, device: &Device) -> Result<Tensor, EditError> {
    let n_channels = channels.len();
    let len = channels.iter().map(Vec::len).min().unwrap_or(0);
    let mut flat = Vec::with_capacity(n_channels * len);
    for mut channel in channels {
        // a truncated final interleaved frame leaves trailing channels short
        channel.truncate(len);
        flat.extend(channel);
    }
    Tensor::from_vec(flat, (n_channels, len), device)
        .map_err(|e| EditError::runtime("waveform tensor", e))
}

/// Writes `waveform` as 16-bit PCM WAV.
pub fn write_wav(path: &Path, waveform: &Waveform) -> Result<(), EditError> {
    let channels = waveform.to_vec2()?;
    if channels.is_empty() {
        return Err(EditError::invalid_input("no audio channels to write"));
    }
    let spec = WavSpec {
        channels: channels.len() as u16,
        sample_rate: waveform.sample_rate_hz(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer =
        WavWriter::create(path, spec).map_err(|e| EditError::runtime("create wav", e))?;
    for idx in 0..waveform.len() {
        for channel in &channels {
            let value = channel[idx].clamp(-1.0, 1.0);
            let scaled = (value * i16::MAX as f32).round() as i16;
            writer
                .write_sample(scaled)
                .map_err(|e| EditError::runtime("write wav", e))?;
        }
    }
    writer
        .finalize()
        .map_err(|e| EditError::runtime("finalize wav", e))
}

/// Zero-pads the last dimension of `samples` up to a multiple of `multiple`.
pub fn pad_to_multiple(samples: &Tensor, multiple: usize) -> Result<Tensor, EditError> {
    if multiple == 0 {
        return Err(EditError::invalid_input("padding multiple must be non-zero"));
    }
    let len = samples
        .dim(D::Minus1)
        .map_err(|e| EditError::runtime("waveform length", e))?;
    let padding = (multiple - len % multiple) % multiple;
    if padding == 0 {
        return Ok(samples.clone());
    }
    samples
        .pad_with_zeros(D::Minus1, 0, padding)
        .map_err(|e| EditError::runtime("pad waveform", e))
}
