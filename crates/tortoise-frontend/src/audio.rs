//! WAV reading and writing for reference clips and generated passages

use crate::error::{FrontendError, FrontendResult};
use crate::types::AudioData;
use std::path::Path;

/// Read a WAV file without resampling or downmixing.
pub fn read_wav(path: impl AsRef<Path>) -> FrontendResult<AudioData> {
    let (samples, sample_rate, channels) = read_wav_samples(path.as_ref())?;
    Ok(AudioData {
        samples,
        sample_rate,
        channels,
    })
}

/// Read a WAV file as mono audio at `target_sample_rate`.
pub fn load_audio(path: impl AsRef<Path>, target_sample_rate: u32) -> FrontendResult<AudioData> {
    let path = path.as_ref();
    let (mut samples, sample_rate, channels) = read_wav_samples(path)?;

    if channels > 1 {
        samples = downmix_to_mono(&samples, channels);
    }
    if sample_rate != target_sample_rate {
        log::debug!(
            "Resampling {} from {} Hz to {} Hz",
            path.display(),
            sample_rate,
            target_sample_rate
        );
        samples = resample_mono(&samples, sample_rate, target_sample_rate);
    }

    Ok(AudioData::mono(samples, target_sample_rate))
}

/// Write audio as a 32-bit float WAV, creating parent directories.
pub fn write_wav(path: impl AsRef<Path>, audio: &AudioData) -> FrontendResult<()> {
    let path = path.as_ref();
    if audio.channels == 0 || audio.channels > u16::MAX as usize {
        return Err(FrontendError::InvalidVoiceData(format!(
            "cannot write {} channel audio",
            audio.channels
        )));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let spec = hound::WavSpec {
        channels: audio.channels as u16,
        sample_rate: audio.sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in &audio.samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    log::debug!(
        "Wrote {:.2}s of audio to {}",
        audio.duration_secs(),
        path.display()
    );
    Ok(())
}

fn read_wav_samples(path: &Path) -> FrontendResult<(Vec<f32>, u32, usize)> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let sample_rate = spec.sample_rate;
    let channels = spec.channels as usize;

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => match spec.bits_per_sample {
            16 => reader
                .samples::<i16>()
                .map(|s| s.map(|v| v as f32 / i16::MAX as f32))
                .collect::<Result<_, _>>()?,
            24 => reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / 8_388_607.0))
                .collect::<Result<_, _>>()?,
            32 => reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / i32::MAX as f32))
                .collect::<Result<_, _>>()?,
            bits => {
                return Err(FrontendError::InvalidVoiceData(format!(
                    "unsupported bit depth {bits} in {}",
                    path.display()
                )));
            }
        },
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
    };

    Ok((samples, sample_rate, channels))
}

fn downmix_to_mono(samples: &[f32], channels: usize) -> Vec<f32> {
    samples
        .chunks(channels)
        .map(|chunk| chunk.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Linear interpolation resampler.
fn resample_mono(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let target_len = (samples.len() as f64 / ratio).ceil() as usize;
    let mut out = Vec::with_capacity(target_len);

    for i in 0..target_len {
        let src_pos = i as f64 * ratio;
        let src_idx = src_pos.floor() as usize;
        let frac = (src_pos - src_idx as f64) as f32;

        let sample = match (samples.get(src_idx), samples.get(src_idx + 1)) {
            (Some(a), Some(b)) => a * (1.0 - frac) + b * frac,
            (Some(a), None) => *a,
            _ => 0.0,
        };
        out.push(sample);
    }

    out
}
