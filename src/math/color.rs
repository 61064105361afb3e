use crate::types::Rgb;

/// Color used whenever a scalar range is unusable (empty or zero-width).
/// Same as the low end of a valid gradient.
pub const FALLBACK_COLOR: Rgb = [0.0, 0.0, 1.0];

/// Blue-to-red gradient over `[min, max]`
///
/// The normalized value is not clamped: values outside the range produce
/// components outside [0, 1]. A zero-width or non-finite range returns
/// [`FALLBACK_COLOR`] instead of dividing by zero.
pub fn map_to_color(value: f32, min: f32, max: f32) -> Rgb {
    let width = max - min;
    if width == 0.0 || !width.is_finite() {
        return FALLBACK_COLOR;
    }

    let t = (value - min) / width;
    [t, (t - 0.5).max(0.0), 1.0 - t]
}

/// A validated, non-degenerate scalar range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    min: f32,
    max: f32,
}

impl ColorScale {
    /// Returns `None` unless both bounds are finite and `max > min`
    pub fn new(min: f32, max: f32) -> Option<Self> {
        (min.is_finite() && max.is_finite() && max > min).then_some(Self { min, max })
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn color(&self, value: f32) -> Rgb {
        map_to_color(value, self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rgb(actual: Rgb, expected: Rgb) {
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!((a - e).abs() < 1e-6, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn test_gradient_endpoints() {
        for (min, max) in [(0.0, 1.0), (-2.0, 3.5), (0.0, 30.0), (0.0, 0.4)] {
            assert_rgb(map_to_color(min, min, max), [0.0, 0.0, 1.0]);
            assert_rgb(map_to_color(max, min, max), [1.0, 0.5, 0.0]);
        }
    }

    #[test]
    fn test_gradient_midpoint() {
        assert_rgb(map_to_color(15.0, 0.0, 30.0), [0.5, 0.0, 0.5]);
    }

    #[test]
    fn test_out_of_range_is_not_clamped() {
        let rgb = map_to_color(60.0, 0.0, 30.0);
        assert_rgb(rgb, [2.0, 1.5, -1.0]);
    }

    #[test]
    fn test_zero_width_range_uses_fallback() {
        assert_eq!(map_to_color(3.0, 3.0, 3.0), FALLBACK_COLOR);
        assert_eq!(map_to_color(0.0, f32::INFINITY, f32::NEG_INFINITY), FALLBACK_COLOR);
    }

    #[test]
    fn test_scale_rejects_degenerate_ranges() {
        assert!(ColorScale::new(0.0, 1.0).is_some());
        assert!(ColorScale::new(1.0, 1.0).is_none());
        assert!(ColorScale::new(2.0, 1.0).is_none());
        assert!(ColorScale::new(f32::INFINITY, f32::NEG_INFINITY).is_none());
        assert!(ColorScale::new(f32::NAN, 1.0).is_none());
    }
}
