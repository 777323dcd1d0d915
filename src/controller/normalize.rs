//! Analog normalization
//!
//! Converts raw trigger and thumbstick magnitudes into calibrated values using the
//! dead zone and threshold from [`CalibrationSettings`]. Thumbsticks use a radial
//! dead zone: both axes are suppressed together while the stick is inside the
//! circle, and the direction is preserved once it leaves it.

use crate::mapping::CalibrationSettings;

/// Largest raw trigger reading
pub const TRIGGER_MAX: f64 = 255.0;

/// Largest raw thumbstick deflection on one axis
pub const THUMBSTICK_MAX: f64 = 32767.0;

/// Trigger position in [0, 1]
///
/// Readings above [`TRIGGER_MAX`] are clamped, readings at or below the threshold read 0.
pub fn trigger_value(raw: u16, threshold: f64) -> f32 {
    let raw = f64::from(raw).min(TRIGGER_MAX);
    let thresh_magnitude = threshold * TRIGGER_MAX;
    if raw <= thresh_magnitude {
        return 0.0;
    }
    let normalized = (raw - thresh_magnitude) / (TRIGGER_MAX - thresh_magnitude);
    normalized.min(1.0) as f32
}

/// One axis of a thumbstick in [-1, 1]
///
/// `along` is the raw value of the requested axis, `x` and `y` are both raw axes
/// of the same stick.
pub fn thumbstick_value(x: i16, y: i16, along_x: bool, dead_zone: f64) -> f32 {
    let x = f64::from(x);
    let y = f64::from(y);
    let zone_magnitude = dead_zone * THUMBSTICK_MAX;

    // Real hardware overshoots, most noticeably on the diagonals
    let magnitude = (x * x + y * y).sqrt().min(THUMBSTICK_MAX);
    if magnitude <= zone_magnitude {
        return 0.0;
    }

    let axis = if along_x { x } else { y };
    let numerator = axis * (magnitude - zone_magnitude);
    let denominator = magnitude * (THUMBSTICK_MAX - zone_magnitude);
    (numerator / denominator).clamp(-1.0, 1.0) as f32
}

/// Normalization bound to one set of calibration values
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    calibration: CalibrationSettings,
}

impl Normalizer {
    pub fn new(calibration: CalibrationSettings) -> Self {
        Self { calibration }
    }

    pub fn calibration(&self) -> &CalibrationSettings {
        &self.calibration
    }

    pub fn trigger(&self, raw: u8) -> f32 {
        trigger_value(u16::from(raw), self.calibration.trigger_threshold)
    }

    pub fn thumbstick(&self, x: i16, y: i16, along_x: bool) -> f32 {
        thumbstick_value(x, y, along_x, self.calibration.thumbstick_dead_zone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_trigger_released() {
        assert_eq!(trigger_value(0, 0.1), 0.0);
    }

    #[test]
    fn test_trigger_full() {
        assert_eq!(trigger_value(255, 0.1), 1.0);
        assert_eq!(trigger_value(255, 0.0), 1.0);
    }

    #[test]
    fn test_trigger_at_threshold_reads_zero() {
        // 0.2 * 255 = 51 exactly
        assert_eq!(trigger_value(51, 0.2), 0.0);
        assert!(trigger_value(52, 0.2) > 0.0);
    }

    #[test]
    fn test_trigger_overshoot_is_clamped() {
        assert_eq!(trigger_value(300, 0.1), 1.0);
    }

    #[test]
    fn test_trigger_midpoint() {
        let half = trigger_value(128, 0.0);
        assert!((half - 128.0 / 255.0).abs() < EPSILON);
    }

    #[test]
    fn test_full_threshold_never_fires() {
        assert_eq!(trigger_value(255, 1.0), 0.0);
    }

    #[test]
    fn test_thumbstick_inside_dead_zone() {
        // 0.25 * 32767 = 8191.75
        for (x, y) in [(8000, 0), (0, -8000), (5000, 5000), (-5000, 5000)] {
            assert_eq!(thumbstick_value(x, y, true, 0.25), 0.0);
            assert_eq!(thumbstick_value(x, y, false, 0.25), 0.0);
        }
    }

    #[test]
    fn test_thumbstick_full_deflection_along_x() {
        let x = thumbstick_value(32767, 0, true, 0.25);
        let y = thumbstick_value(32767, 0, false, 0.25);
        assert!((x - 1.0).abs() < EPSILON);
        assert!(y.abs() < EPSILON);

        let x = thumbstick_value(-32767, 0, true, 0.25);
        assert!((x + 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_thumbstick_dead_zone_is_radial() {
        // Each axis alone is below the zone, together they leave it
        let x = thumbstick_value(6000, 6000, true, 0.25);
        let y = thumbstick_value(6000, 6000, false, 0.25);
        assert!(x > 0.0);
        assert!((x - y).abs() < EPSILON);
    }

    #[test]
    fn test_thumbstick_overshoot_stays_in_range() {
        let x = thumbstick_value(i16::MIN, i16::MIN, true, 0.0);
        assert!((-1.0..=1.0).contains(&x));
        assert!(x < 0.0);
    }

    #[test]
    fn test_full_dead_zone_silences_overshoot() {
        assert_eq!(thumbstick_value(32767, 100, true, 1.0), 0.0);
        assert_eq!(thumbstick_value(23170, 23170, false, 1.0), 0.0);
        assert_eq!(thumbstick_value(i16::MIN, i16::MIN, true, 1.0), 0.0);
    }

    #[test]
    fn test_normalizer_uses_calibration() {
        let calibration = CalibrationSettings {
            trigger_threshold: 0.5,
            thumbstick_dead_zone: 0.0,
            ..Default::default()
        };
        let normalizer = Normalizer::new(calibration);
        assert_eq!(normalizer.trigger(100), 0.0);
        assert!(normalizer.trigger(200) > 0.0);
        assert!(normalizer.thumbstick(100, 0, true) > 0.0);
    }
}
