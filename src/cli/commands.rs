//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;

use log::info;
use serde::Serialize;

use crate::dsp::impulse::{seeded_rng, synthesize};
use crate::dsp::{ConvolutionMethod, ReverbParameters, ReverbPreset};
use crate::engine::analysis::SignalReport;
use crate::engine::buffer::AudioBuffer;
use crate::engine::io::{load_wav, save_wav};
use crate::error::Result;
use crate::pipeline::ReverbProcessor;

/// Settings for `process` beyond the reverb parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessSettings {
    pub seed: Option<u64>,
    pub max_duration: Option<f64>,
    pub bit_depth: u16,
    pub method: ConvolutionMethod,
}

impl Default for ProcessSettings {
    fn default() -> Self {
        Self {
            seed: None,
            max_duration: None,
            bit_depth: 24,
            method: ConvolutionMethod::Auto,
        }
    }
}

/// Add reverb to a WAV file and write the stereo result.
pub fn process(
    input: &Path,
    output: &Path,
    params: ReverbParameters,
    settings: &ProcessSettings,
) -> Result<SignalReport> {
    info!("Processing {} -> {}", input.display(), output.display());

    let buffer = load_wav(input)?;
    info!(
        "Loaded {:.2}s of {} channel audio at {} Hz",
        buffer.duration_secs(),
        buffer.channels(),
        buffer.sample_rate()
    );

    let mut processor = ReverbProcessor::new(params)?.with_convolution_method(settings.method);
    if let Some(seconds) = settings.max_duration {
        processor = processor.with_max_duration(seconds);
    }

    let result = processor.process_seeded(&buffer, settings.seed)?;
    if let Some(seed) = result.seed {
        info!("Impulse response seed: {} (pass --seed {} to reproduce)", seed, seed);
    }

    let processed = result.into_audio_buffer();
    save_wav(&processed, output, settings.bit_depth)?;

    let report = SignalReport::analyze(&processed);
    println!("Wrote {}", output.display());
    println!("{}", report.summary());

    Ok(report)
}

/// Write the synthesized impulse response as a mono WAV file.
pub fn render_ir(
    output: &Path,
    params: &ReverbParameters,
    sample_rate: u32,
    seed: Option<u64>,
    bit_depth: u16,
) -> Result<()> {
    info!("Rendering impulse response to {}", output.display());

    let seed = seed.unwrap_or_else(rand::random);
    let ir = synthesize(params, sample_rate, &mut seeded_rng(Some(seed)))?;
    let duration = ir.duration_secs();

    let buffer = AudioBuffer::mono(ir.into_samples(), sample_rate);
    save_wav(&buffer, output, bit_depth)?;

    println!(
        "Wrote {} ({:.2}s at {} Hz, seed {})",
        output.display(),
        duration,
        sample_rate,
        seed
    );

    Ok(())
}

#[derive(Serialize)]
struct PresetListing {
    name: &'static str,
    #[serde(flatten)]
    parameters: ReverbParameters,
}

/// Render every built-in preset as a JSON array.
pub fn presets_json() -> Result<String> {
    let listing: Vec<PresetListing> = ReverbPreset::ALL
        .into_iter()
        .map(|preset| PresetListing {
            name: preset.name(),
            parameters: preset.parameters(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&listing)?)
}

/// Print the built-in presets.
pub fn list_presets() -> Result<()> {
    println!("{}", presets_json()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::buffer::peak_abs;
    use approx::assert_abs_diff_eq;
    use serde_json::Value;
    use tempfile::tempdir;

    fn write_click(path: &Path, sample_rate: u32) {
        let mut samples = vec![0.0; sample_rate as usize / 2];
        samples[100] = 0.9;
        save_wav(&AudioBuffer::mono(samples, sample_rate), path, 16).unwrap();
    }

    #[test]
    fn test_process_writes_stereo_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("click.wav");
        let output = dir.path().join("wet.wav");
        write_click(&input, 8000);

        let settings = ProcessSettings {
            seed: Some(5),
            bit_depth: 32,
            ..ProcessSettings::default()
        };
        let report =
            process(&input, &output, ReverbPreset::Studio.parameters(), &settings).unwrap();

        let written = load_wav(&output).unwrap();
        assert_eq!(written.channels(), 2);
        assert_eq!(written.len(), 4000);
        assert_eq!(report.channels, 2);
        assert_abs_diff_eq!(report.peak_linear, 0.95, epsilon = 1e-6);
    }

    #[test]
    fn test_render_ir_is_normalized() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("ir.wav");

        render_ir(&output, &ReverbPreset::SmallRoom.parameters(), 8000, Some(1), 32).unwrap();

        let ir = load_wav(&output).unwrap();
        assert_eq!(ir.channels(), 1);
        assert_eq!(ir.len(), 4800);
        assert_abs_diff_eq!(peak_abs(ir.channel(0)), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_presets_json_lists_all() {
        let json: Value = serde_json::from_str(&presets_json().unwrap()).unwrap();
        let entries = json.as_array().unwrap();

        assert_eq!(entries.len(), ReverbPreset::ALL.len());
        assert_eq!(entries[2]["name"], "hall");
        assert_eq!(entries[2]["decay_time_seconds"], 2.5);
    }
}
