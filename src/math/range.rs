use super::color::ColorScale;

/// Observed `[min, max]` of a scalar channel
///
/// The empty range is `{ min: +inf, max: -inf }`; use [`ValueRange::to_scale`]
/// to get something safe to color with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub const EMPTY: ValueRange = ValueRange {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn include(&mut self, value: f32) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Finite and strictly wider than zero
    pub fn is_valid(&self) -> bool {
        self.to_scale().is_some()
    }

    pub fn to_scale(&self) -> Option<ColorScale> {
        ColorScale::new(self.min, self.max)
    }
}

impl From<[f32; 2]> for ValueRange {
    fn from(bounds: [f32; 2]) -> Self {
        Self::new(bounds[0], bounds[1])
    }
}

/// Single pass over `values`
pub fn find_range(values: impl IntoIterator<Item = f32>) -> ValueRange {
    values.into_iter().fold(ValueRange::EMPTY, |mut range, v| {
        range.include(v);
        range
    })
}
