//! Stereo widener
//!
//! Derives a stereo wet signal from the mono wet signal. The right channel is
//! a 1 ms delayed copy; mid/side scaling then sets how much of that
//! inter-channel difference survives.

use log::debug;

use crate::engine::buffer::StereoSignal;

/// Inter-channel delay in seconds
pub const HAAS_DELAY_SECONDS: f64 = 0.001;

/// Widen a mono wet signal into left/right
///
/// Width 0 collapses to mono (both channels equal the mid signal), width 1
/// keeps the full delayed copy on the right.
pub fn widen(wet: Vec<f64>, width: f64, enabled: bool, sample_rate: u32) -> StereoSignal {
    if !enabled {
        return StereoSignal::dual_mono(wet);
    }

    let delay = (HAAS_DELAY_SECONDS * sample_rate as f64).round() as usize;
    let len = wet.len();
    let delayed = |i: usize| if i >= delay { wet[i - delay] } else { 0.0 };

    let (left, right): (Vec<f64>, Vec<f64>) = (0..len)
        .map(|i| {
            let (l, r) = (wet[i], delayed(i));
            let mid = (l + r) / 2.0;
            let side = (l - r) / 2.0 * width;
            (mid + side, mid - side)
        })
        .unzip();

    debug!("Widened {} samples ({} sample delay, width {:.2})", len, delay, width);

    StereoSignal::from_equal_channels(left, right)
}
