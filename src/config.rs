use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::Cli;
use crate::math::ValueRange;

pub const DEFAULT_FRAME_COUNT: usize = 30;
/// Fixed so distance colors are comparable across frames
pub const DEFAULT_DISTANCE_RANGE: [f32; 2] = [0.0, 30.0];
pub const DEFAULT_REFLECTION_RANGE: [f32; 2] = [0.0, 0.4];
pub const DEFAULT_PLAYBACK_HZ: f32 = 10.0;
pub const INITIAL_WINDOW_WIDTH: u32 = 1280;
pub const INITIAL_WINDOW_HEIGHT: u32 = 800;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: INITIAL_WINDOW_WIDTH,
            height: INITIAL_WINDOW_HEIGHT,
        }
    }
}

/// Viewer settings. Every field has a default, so a config file only needs
/// the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub frame_count: usize,
    pub distance_range: [f32; 2],
    pub reflection_range: [f32; 2],
    /// Frames per second while playing
    pub playback_hz: f32,
    pub derive_trails: bool,
    pub window: WindowConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            frame_count: DEFAULT_FRAME_COUNT,
            distance_range: DEFAULT_DISTANCE_RANGE,
            reflection_range: DEFAULT_REFLECTION_RANGE,
            playback_hz: DEFAULT_PLAYBACK_HZ,
            derive_trails: false,
            window: WindowConfig::default(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_json(&text).with_context(|| format!("Invalid config file: {:?}", path))
    }

    /// Config file (if any) with command-line flags applied on top
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(frames) = cli.frames {
            config.frame_count = frames;
        }
        if cli.derive_trails {
            config.derive_trails = true;
        }
        if !(config.playback_hz > 0.0) {
            log::warn!(
                "playback_hz must be positive, got {}; using {}",
                config.playback_hz,
                DEFAULT_PLAYBACK_HZ
            );
            config.playback_hz = DEFAULT_PLAYBACK_HZ;
        }
        Ok(config)
    }

    pub fn distance_range(&self) -> ValueRange {
        self.distance_range.into()
    }

    pub fn reflection_range(&self) -> ValueRange {
        self.reflection_range.into()
    }
}
