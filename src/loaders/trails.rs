use std::collections::BTreeMap;
use std::path::Path;

use super::read_text;
use crate::error::LoadError;
use crate::types::{FrameTrails, TrailId, TrailPosition};

type TrailEntry = BTreeMap<String, Option<Vec<TrailPosition>>>;

/// Parses `[{ "<id>": [{ "x": .., "y": .., "z": .. }, ...] }, ...]`
///
/// `null` stands for "not tracked in this frame" and becomes an empty list.
pub fn parse_trails_json(text: &str, path: &Path) -> Result<FrameTrails, LoadError> {
    let entries: Vec<TrailEntry> = serde_json::from_str(text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(entries
        .into_iter()
        .flat_map(|entry| entry.into_iter())
        .map(|(id, positions)| (TrailId::new(id), positions.unwrap_or_default()))
        .collect())
}

pub fn load_trails(path: impl AsRef<Path>) -> Result<FrameTrails, LoadError> {
    let path = path.as_ref();
    parse_trails_json(&read_text(path)?, path)
}
