pub mod dataset;
pub mod labels;
pub mod lidar;
pub mod trails;

pub use dataset::{Dataset, DatasetLayout, FrameData, LoadOptions};
pub use labels::{load_labels, parse_labels_json, parse_labels_text};
pub use lidar::{load_lidar, parse_lidar_bin, parse_lidar_json};
pub use trails::{load_trails, parse_trails_json};

use std::path::Path;

use crate::error::LoadError;

fn read_text(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, LoadError> {
    std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(ext)
}
