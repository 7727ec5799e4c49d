//! CLI Module
//!
//! Command-line interface for the roomverb binary.

pub mod commands;

use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::debug;
use serde_json::Value;

use crate::dsp::{ConvolutionMethod, ReverbParameters, ReverbPreset};
use crate::error::{ReverbError, Result};

/// Roomverb - synthetic room reverb for WAV files
#[derive(Parser, Debug)]
#[command(name = "roomverb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add reverb to a WAV file
    #[command(name = "process")]
    Process {
        /// Input WAV file (mono or stereo)
        input: PathBuf,

        /// Output WAV file (always stereo)
        output: PathBuf,

        #[command(flatten)]
        params: ParamArgs,

        /// Seed for impulse response synthesis
        #[arg(long)]
        seed: Option<u64>,

        /// Only process the first N seconds of the input
        #[arg(long, value_name = "SECONDS")]
        max_duration: Option<f64>,

        /// Output bit depth (16, 24 or 32 float)
        #[arg(long, default_value_t = 24)]
        bit_depth: u16,

        /// Convolution method
        #[arg(long, value_enum, default_value_t = MethodArg::Auto)]
        method: MethodArg,
    },

    /// Write the synthesized impulse response as a mono WAV file
    #[command(name = "render-ir")]
    RenderIr {
        /// Output WAV file
        output: PathBuf,

        #[command(flatten)]
        params: ParamArgs,

        /// Sample rate of the impulse response
        #[arg(long, default_value_t = 44100)]
        sample_rate: u32,

        /// Seed for impulse response synthesis
        #[arg(long)]
        seed: Option<u64>,

        /// Output bit depth (16, 24 or 32 float)
        #[arg(long, default_value_t = 32)]
        bit_depth: u16,
    },

    /// Print the built-in presets as JSON
    #[command(name = "presets")]
    Presets,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodArg {
    Auto,
    Direct,
    Fft,
}

impl From<MethodArg> for ConvolutionMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Auto => ConvolutionMethod::Auto,
            MethodArg::Direct => ConvolutionMethod::Direct,
            MethodArg::Fft => ConvolutionMethod::Fft,
        }
    }
}

/// Reverb parameter sources
///
/// Flags override the JSON file, which overrides the preset.
#[derive(Args, Debug, Clone, Default)]
pub struct ParamArgs {
    /// Starting preset (small-room, studio, hall, cathedral, plate) [default: hall]
    #[arg(long)]
    pub preset: Option<ReverbPreset>,

    /// JSON file with some or all reverb parameters
    #[arg(long = "params", value_name = "FILE")]
    pub params_file: Option<PathBuf>,

    /// Room size (0-1)
    #[arg(long)]
    pub room_size: Option<f64>,

    /// Pre-delay in seconds
    #[arg(long)]
    pub pre_delay: Option<f64>,

    /// Decay time (RT60) in seconds
    #[arg(long)]
    pub decay: Option<f64>,

    /// High-frequency damping (0-1)
    #[arg(long)]
    pub damping: Option<f64>,

    /// Wet level (0-1)
    #[arg(long)]
    pub wet: Option<f64>,

    /// Dry level (0-1)
    #[arg(long)]
    pub dry: Option<f64>,

    /// Bass tone, 0.5 is neutral (0-1)
    #[arg(long)]
    pub low_tone: Option<f64>,

    /// Treble tone, 0.5 is neutral (0-1)
    #[arg(long)]
    pub high_tone: Option<f64>,

    /// Stereo width (0-1)
    #[arg(long)]
    pub width: Option<f64>,

    /// Disable stereo widening
    #[arg(long)]
    pub no_stereo: bool,

    /// Overall reverberation amount (0-1)
    #[arg(long)]
    pub reverberation: Option<f64>,

    /// Number of early reflections
    #[arg(long)]
    pub early_reflections: Option<usize>,

    /// Early reflection gain (0-1)
    #[arg(long)]
    pub early_gain: Option<f64>,
}

impl ParamArgs {
    /// Layer preset, params file and flags into validated parameters
    pub fn resolve(&self) -> Result<ReverbParameters> {
        let preset = self.preset.unwrap_or(ReverbPreset::Hall);
        let mut params = preset.parameters();

        if let Some(path) = &self.params_file {
            debug!("Merging parameters from {}", path.display());
            let overrides: Value = serde_json::from_str(&fs::read_to_string(path)?)?;
            let fields = match overrides {
                Value::Object(fields) => fields,
                other => {
                    return Err(ReverbError::invalid_parameter(
                        "params",
                        other,
                        "a JSON object of reverb parameters",
                    ))
                }
            };
            let mut merged = serde_json::to_value(&params)?;
            if let Value::Object(base) = &mut merged {
                base.extend(fields);
            }
            params = serde_json::from_value(merged)?;
        }

        let flags = [
            (&mut params.room_size, self.room_size),
            (&mut params.pre_delay_seconds, self.pre_delay),
            (&mut params.decay_time_seconds, self.decay),
            (&mut params.damping, self.damping),
            (&mut params.wet_level, self.wet),
            (&mut params.dry_level, self.dry),
            (&mut params.low_tone, self.low_tone),
            (&mut params.high_tone, self.high_tone),
            (&mut params.stereo_width, self.width),
            (&mut params.reverberation, self.reverberation),
            (&mut params.early_reflection_gain, self.early_gain),
        ];
        for (field, flag) in flags {
            if let Some(value) = flag {
                *field = value;
            }
        }
        if let Some(count) = self.early_reflections {
            params.num_early_reflections = count;
        }
        if self.no_stereo {
            params.enable_stereo = false;
        }

        params.validate()?;
        Ok(params)
    }
}
