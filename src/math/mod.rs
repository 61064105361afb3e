mod aabb;
mod axis;
mod color;
mod range;

pub use aabb::AABB;
pub use axis::{scene_to_sensor, sensor_to_scene};
pub use color::{map_to_color, ColorScale, FALLBACK_COLOR};
pub use range::{find_range, ValueRange};
