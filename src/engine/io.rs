//! Audio file I/O
//!
//! Loads and saves WAV files with the hound crate. This sits outside the
//! reverb pipeline: it only converts between files and `AudioBuffer`.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::debug;

use crate::engine::buffer::{AudioBuffer, ChannelLayout};
use crate::error::{ReverbError, Result};

/// Bit depths accepted by `save_wav`
pub const SUPPORTED_BIT_DEPTHS: [u16; 3] = [16, 24, 32];

/// Load a WAV file into an AudioBuffer
///
/// Integer formats are scaled to -1.0..1.0; float formats are read as is.
///
/// # Errors
/// * `AudioRead` - the file cannot be opened or decoded
/// * `UnsupportedChannels` - more than two channels
pub fn load_wav<P: AsRef<Path>>(path: P) -> Result<AudioBuffer> {
    let path = path.as_ref();
    let read_error = |source| ReverbError::AudioRead {
        path: path.display().to_string(),
        source,
    };

    let reader = WavReader::open(path).map_err(read_error)?;
    let spec = reader.spec();
    let layout = ChannelLayout::from_count(spec.channels as usize).ok_or(
        ReverbError::UnsupportedChannels {
            channels: spec.channels as usize,
        },
    )?;

    let samples: Vec<f64> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(f64::from).map_err(read_error))
            .collect::<Result<Vec<f64>>>()?,
        SampleFormat::Int => {
            let max_val = (1u64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f64 / max_val).map_err(read_error))
                .collect::<Result<Vec<f64>>>()?
        }
    };

    debug!(
        "Loaded {}: {} Hz, {} ch, {}-bit {:?}",
        path.display(),
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample,
        spec.sample_format
    );

    AudioBuffer::from_interleaved(&samples, layout, spec.sample_rate)
}

/// Save an AudioBuffer to a WAV file
///
/// `bit_depth` 16 and 24 write integer PCM (samples clamped to -1.0..1.0),
/// 32 writes IEEE float.
pub fn save_wav<P: AsRef<Path>>(buffer: &AudioBuffer, path: P, bit_depth: u16) -> Result<()> {
    let path = path.as_ref();
    if !SUPPORTED_BIT_DEPTHS.contains(&bit_depth) {
        return Err(ReverbError::invalid_parameter(
            "bit_depth",
            bit_depth,
            "16, 24 or 32",
        ));
    }
    let write_error = |source| ReverbError::AudioWrite {
        path: path.display().to_string(),
        source,
    };

    let sample_format = if bit_depth == 32 {
        SampleFormat::Float
    } else {
        SampleFormat::Int
    };
    let spec = WavSpec {
        channels: buffer.channels() as u16,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: bit_depth,
        sample_format,
    };

    let mut writer = WavWriter::create(path, spec).map_err(write_error)?;

    let max_val = ((1u64 << (bit_depth - 1)) - 1) as f64;
    for sample in buffer.to_interleaved() {
        let written = match sample_format {
            SampleFormat::Float => writer.write_sample(sample as f32),
            SampleFormat::Int => writer.write_sample((sample.clamp(-1.0, 1.0) * max_val) as i32),
        };
        written.map_err(write_error)?;
    }

    writer.finalize().map_err(write_error)?;
    debug!("Wrote {} ({}-bit)", path.display(), bit_depth);

    Ok(())
}
