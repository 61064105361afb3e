use std::path::Path;

use serde::Deserialize;

use super::{has_extension, read_bytes, read_text};
use crate::error::LoadError;
use crate::types::Point;

const BYTES_PER_POINT: usize = 4 * std::mem::size_of::<f32>();

#[derive(Deserialize)]
struct LidarFile {
    data: Vec<Vec<f32>>,
}

/// Parses `{ "data": [[x, y, z, intensity], ...] }`
pub fn parse_lidar_json(text: &str, path: &Path) -> Result<Vec<Point>, LoadError> {
    let file: LidarFile = serde_json::from_str(text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    file.data
        .iter()
        .enumerate()
        .map(|(row, values)| match values.as_slice() {
            &[x, y, z, intensity] => checked_point(Point::new(x, y, z, intensity), row, path),
            other => Err(LoadError::malformed(
                path,
                format!("row {} has {} values, expected 4", row, other.len()),
            )),
        })
        .collect()
}

/// Parses a raw sensor dump: little-endian f32 quadruples
pub fn parse_lidar_bin(bytes: &[u8], path: &Path) -> Result<Vec<Point>, LoadError> {
    if bytes.len() % BYTES_PER_POINT != 0 {
        return Err(LoadError::malformed(
            path,
            format!(
                "{} bytes is not a whole number of {}-byte points",
                bytes.len(),
                BYTES_PER_POINT
            ),
        ));
    }

    bytes
        .chunks_exact(BYTES_PER_POINT)
        .enumerate()
        .map(|(row, chunk)| {
            let mut values = [0.0f32; 4];
            for (value, raw) in values.iter_mut().zip(chunk.chunks_exact(4)) {
                *value = f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
            }
            checked_point(Point::from_row(values), row, path)
        })
        .collect()
}

/// Loads a `.json` or `.bin` frame, chosen by extension
pub fn load_lidar(path: impl AsRef<Path>) -> Result<Vec<Point>, LoadError> {
    let path = path.as_ref();
    if has_extension(path, "bin") {
        parse_lidar_bin(&read_bytes(path)?, path)
    } else {
        parse_lidar_json(&read_text(path)?, path)
    }
}

fn checked_point(point: Point, row: usize, path: &Path) -> Result<Point, LoadError> {
    if point.is_finite() {
        Ok(point)
    } else {
        Err(LoadError::malformed(path, format!("row {} is not finite", row)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> &'static Path {
        Path::new("0.bin.json")
    }

    #[test]
    fn parses_json_rows() {
        let points =
            parse_lidar_json(r#"{ "data": [[1, 2, 3, 0.1], [-4.5, 0, 0.25, 0.3]] }"#, path()).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], Point::new(1.0, 2.0, 3.0, 0.1));
        assert_eq!(points[1], Point::new(-4.5, 0.0, 0.25, 0.3));
    }

    #[test]
    fn rejects_short_rows() {
        let err = parse_lidar_json(r#"{ "data": [[1, 2, 3, 0.1], [1, 2, 3]] }"#, path()).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn rejects_wrong_shape() {
        let err = parse_lidar_json(r#"{ "points": [] }"#, path()).unwrap_err();
        assert!(matches!(err, LoadError::Json { .. }));
    }

    #[test]
    fn parses_binary_dump() {
        let mut bytes = Vec::new();
        for v in [1.0f32, 2.0, 3.0, 0.25, -1.0, -2.0, -3.0, 0.0] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        let points = parse_lidar_bin(&bytes, Path::new("0.bin")).unwrap();
        assert_eq!(
            points,
            vec![Point::new(1.0, 2.0, 3.0, 0.25), Point::new(-1.0, -2.0, -3.0, 0.0)]
        );
    }

    #[test]
    fn rejects_truncated_binary() {
        let bytes = vec![0u8; 20];
        assert!(matches!(
            parse_lidar_bin(&bytes, Path::new("0.bin")),
            Err(LoadError::Malformed { .. })
        ));
    }

    #[test]
    fn rejects_nan_in_binary() {
        let mut bytes = Vec::new();
        for v in [1.0f32, f32::NAN, 3.0, 0.25] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        assert!(parse_lidar_bin(&bytes, Path::new("0.bin")).is_err());
    }
}
