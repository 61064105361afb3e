use std::path::PathBuf;

use thiserror::Error;

use crate::types::ColorChannel;

/// Failure to read one input file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed data in {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },
}

impl LoadError {
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        LoadError::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Problem found while building one frame's renderables
///
/// None of these abort the build; they are collected in a [`BuildReport`].
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("frame {frame}: label {label} has unknown object class {class:?}")]
    UnknownClass {
        frame: usize,
        label: String,
        class: String,
    },

    #[error("frame {frame}: no usable {channel} range [{min}, {max}], using fallback color")]
    DegenerateRange {
        frame: usize,
        channel: ColorChannel,
        min: f32,
        max: f32,
    },

    #[error("frame {frame}: {source}")]
    Load {
        frame: usize,
        #[source]
        source: LoadError,
    },
}

impl BuildError {
    pub fn frame(&self) -> usize {
        match self {
            BuildError::UnknownClass { frame, .. }
            | BuildError::DegenerateRange { frame, .. }
            | BuildError::Load { frame, .. } => *frame,
        }
    }
}

/// Every load/build problem, grouped by the frame it affects
#[derive(Debug, Default)]
pub struct BuildReport {
    errors: Vec<BuildError>,
}

impl BuildReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: BuildError) {
        self.errors.push(error);
    }

    pub fn extend(&mut self, errors: impl IntoIterator<Item = BuildError>) {
        self.errors.extend(errors);
    }

    pub fn errors(&self) -> &[BuildError] {
        &self.errors
    }

    pub fn for_frame(&self, frame: usize) -> impl Iterator<Item = &BuildError> {
        self.errors.iter().filter(move |e| e.frame() == frame)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Write every entry to the log, one line each
    pub fn log(&self) {
        if self.errors.is_empty() {
            log::info!("All frames built without diagnostics");
            return;
        }
        for error in &self.errors {
            log::warn!("{}", error);
        }
        log::warn!("{} build diagnostic(s)", self.errors.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_groups_by_frame() {
        let mut report = BuildReport::new();
        report.push(BuildError::UnknownClass {
            frame: 2,
            label: "7".into(),
            class: "TRUCK".into(),
        });
        report.push(BuildError::DegenerateRange {
            frame: 4,
            channel: ColorChannel::Height,
            min: 1.0,
            max: 1.0,
        });
        report.push(BuildError::Load {
            frame: 2,
            source: LoadError::malformed("label0002.txt", "line 3: expected 9 fields"),
        });

        assert_eq!(report.len(), 3);
        assert_eq!(report.for_frame(2).count(), 2);
        assert_eq!(report.for_frame(4).count(), 1);
        assert_eq!(report.for_frame(0).count(), 0);
    }

    #[test]
    fn messages_name_the_frame_and_file() {
        let err = BuildError::Load {
            frame: 3,
            source: LoadError::malformed("data/3.bin.json", "row 5 has 3 values"),
        };
        let text = err.to_string();
        assert!(text.contains("frame 3"));
        assert!(text.contains("data/3.bin.json"));
    }
}
