use std::path::{Path, PathBuf};

use super::{load_labels, load_lidar, load_trails};
use crate::error::{BuildError, LoadError};
use crate::geometry::extract_frame_trails;
use crate::types::{FrameTrails, Label, Point};

/// File naming of a recorded sequence directory
#[derive(Debug, Clone)]
pub struct DatasetLayout {
    dir: PathBuf,
}

impl DatasetLayout {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Converted JSON first, raw sensor dump second
    pub fn lidar_candidates(&self, frame: usize) -> [PathBuf; 2] {
        [
            self.dir.join(format!("{frame}.bin.json")),
            self.dir.join(format!("{frame}.bin")),
        ]
    }

    pub fn label_candidates(&self, frame: usize) -> [PathBuf; 2] {
        [
            self.dir.join(format!("label00{frame:02}.txt.json")),
            self.dir.join(format!("label00{frame:02}.txt")),
        ]
    }

    pub fn trail_path(&self, frame: usize) -> PathBuf {
        self.dir.join(format!("filtered_point_cloud_data{frame}.json"))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Build trails from labels for frames that have no trail file
    pub derive_missing_trails: bool,
}

/// Raw inputs of one frame
#[derive(Debug, Clone, Default)]
pub struct FrameData {
    pub points: Vec<Point>,
    pub labels: Vec<Label>,
    pub trails: FrameTrails,
}

/// All frames of a sequence plus whatever went wrong reading them
#[derive(Debug, Default)]
pub struct Dataset {
    pub frames: Vec<FrameData>,
    pub errors: Vec<BuildError>,
}

impl Dataset {
    pub fn from_frames(frames: Vec<FrameData>) -> Self {
        Self {
            frames,
            errors: Vec::new(),
        }
    }

    /// Loads `frame_count` frames. A file that is missing or malformed
    /// leaves that part of its frame empty and is recorded in `errors`;
    /// the other frames still load.
    pub fn load(dir: impl Into<PathBuf>, frame_count: usize, options: LoadOptions) -> Self {
        let layout = DatasetLayout::new(dir);
        let mut dataset = Dataset::default();

        for frame in 0..frame_count {
            let mut data = FrameData::default();

            match first_existing(&layout.lidar_candidates(frame)).map(load_lidar) {
                Ok(Ok(points)) => data.points = points,
                Ok(Err(source)) | Err(source) => dataset.errors.push(BuildError::Load { frame, source }),
            }

            match first_existing(&layout.label_candidates(frame)).map(load_labels) {
                Ok(Ok(labels)) => data.labels = labels,
                Ok(Err(source)) | Err(source) => dataset.errors.push(BuildError::Load { frame, source }),
            }

            let trail_path = layout.trail_path(frame);
            if trail_path.exists() {
                match load_trails(&trail_path) {
                    Ok(trails) => data.trails = trails,
                    Err(source) => dataset.errors.push(BuildError::Load { frame, source }),
                }
            } else if options.derive_missing_trails {
                log::debug!("Frame {}: deriving trails from {} labels", frame, data.labels.len());
                data.trails = extract_frame_trails(&data.points, &data.labels);
            } else {
                dataset.errors.push(BuildError::Load {
                    frame,
                    source: not_found(trail_path),
                });
            }

            dataset.frames.push(data);
        }

        log::info!(
            "Loaded {} frames from {:?} ({} load errors)",
            dataset.frames.len(),
            layout.dir(),
            dataset.errors.len()
        );
        dataset
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// True when not a single frame produced any points
    pub fn is_empty(&self) -> bool {
        self.frames.iter().all(|f| f.points.is_empty())
    }
}

fn first_existing(candidates: &[PathBuf]) -> Result<&PathBuf, LoadError> {
    candidates
        .iter()
        .find(|p| p.exists())
        .ok_or_else(|| not_found(candidates[0].clone()))
}

fn not_found(path: PathBuf) -> LoadError {
    LoadError::Io {
        path,
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
    }
}
