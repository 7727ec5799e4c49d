//! Reverb DSP
//!
//! The stages of the reverb pipeline, each a pure function over owned
//! buffers:
//! 1. Impulse response synthesis (the only stage that draws random numbers)
//! 2. Convolution
//! 3. Tone shaping
//! 4. Stereo widening
//! 5. Dry/wet mixing

pub mod convolution;
pub mod filter;
pub mod impulse;
pub mod mixer;
pub mod params;
pub mod stereo;
pub mod tone;

pub use convolution::ConvolutionMethod;
pub use filter::Biquad;
pub use impulse::{seeded_rng, synthesize, ImpulseResponse};
pub use mixer::{mix, OUTPUT_HEADROOM};
pub use params::{ReverbParameters, ReverbPreset};
pub use stereo::widen;
pub use tone::shape;
