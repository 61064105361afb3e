//! Sensor data is z-up; the scene is y-up. Every position or extent that
//! crosses from loaded data into geometry goes through these two functions,
//! so points, label boxes and trails all agree on the permutation.

use glam::Vec3;

/// `(x, y, z)` sensor -> `(x, z, y)` scene
pub fn sensor_to_scene(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, z, y)
}

/// Inverse of [`sensor_to_scene`] (the swap is its own inverse)
pub fn scene_to_sensor(v: Vec3) -> [f32; 3] {
    [v.x, v.z, v.y]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_height_becomes_scene_up() {
        let v = sensor_to_scene(1.0, 2.0, 3.0);
        assert_eq!(v, Vec3::new(1.0, 3.0, 2.0));
        assert_eq!(v.y, 3.0);
    }

    #[test]
    fn test_round_trip() {
        let v = sensor_to_scene(-4.5, 0.25, 9.0);
        assert_eq!(scene_to_sensor(v), [-4.5, 0.25, 9.0]);
    }

    #[test]
    fn test_preserves_horizontal_distance() {
        let v = sensor_to_scene(3.0, 4.0, -1.0);
        assert!(((v.x * v.x + v.z * v.z).sqrt() - 5.0).abs() < 1e-6);
    }
}
