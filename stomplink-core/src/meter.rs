//! Peak meter quantization
//!
//! The audio node reports signal peaks as a segment count for an 8-LED
//! style bar. Segments light at fixed dBFS steps, finer near the top.

/// Number of segments in a full bar
pub const SEGMENTS: u8 = 8;

/// Peaks at or below this are treated as silence
pub const SILENCE_FLOOR: f32 = 0.0001;

/// Segment thresholds in dBFS, lowest first
pub const THRESHOLDS_DB: [i8; SEGMENTS as usize] = [-42, -36, -30, -24, -18, -12, -9, -6];

/// The same thresholds as linear amplitude, `10^(dB / 20)`
///
/// `log10` is not available in `core`, so peaks are compared in the linear
/// domain instead of converting each one to dB.
const THRESHOLDS_LINEAR: [f32; SEGMENTS as usize] = [
    0.007_943_282, // -42
    0.015_848_932, // -36
    0.031_622_777, // -30
    0.063_095_734, // -24
    0.125_892_54,  // -18
    0.251_188_64,  // -12
    0.354_813_4,   // -9
    0.501_187_2,   // -6
];

/// Convert a peak amplitude (full scale = 1.0) to a lit segment count
///
/// Negative peaks are measured by magnitude. NaN reads as silence.
pub fn peak_to_segments(peak: f32) -> u8 {
    let peak = if peak < 0.0 { -peak } else { peak };
    // Written so that NaN falls through to silence
    if !(peak > SILENCE_FLOOR) {
        return 0;
    }
    THRESHOLDS_LINEAR.iter().filter(|&&t| peak >= t).count() as u8
}
