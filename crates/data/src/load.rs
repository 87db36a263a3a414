use crate::{builtin_presets, RosterPreset};
use anyhow::Context;
use rolldraw_core::DrawConfig;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const DRAW_CONFIG_FILE: &str = "draw.json";
const PRESETS_FILE: &str = "presets.json";
const DEFAULT_ASSETS_DIR: &str = "assets";

pub fn default_assets_dir() -> PathBuf {
    std::env::var_os("ROLLDRAW_ASSETS")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS_DIR))
}

/// Reads `draw.json` from `dir`. A missing file yields the defaults; a malformed one is an
/// error.
pub fn load_draw_config(dir: &Path) -> anyhow::Result<DrawConfig> {
    let path = dir.join(DRAW_CONFIG_FILE);
    if !path.exists() {
        debug!(path = %path.display(), "no draw config, using defaults");
        return Ok(DrawConfig::default());
    }
    let config: DrawConfig = load_json(&path)?;
    Ok(config.sanitized())
}

/// Reads `presets.json` from `dir`, falling back to the built-in presets when it is missing.
/// Presets with an empty or repeated id are skipped with a warning.
pub fn load_presets(dir: &Path) -> anyhow::Result<Vec<RosterPreset>> {
    let path = dir.join(PRESETS_FILE);
    if !path.exists() {
        return Ok(builtin_presets());
    }
    let raw: Vec<RosterPreset> = load_json(&path)?;
    let mut seen = HashSet::new();
    let mut presets = Vec::with_capacity(raw.len());
    for preset in raw {
        let id = preset.id.trim().to_string();
        if id.is_empty() {
            warn!(path = %path.display(), name = %preset.name, "preset without id skipped");
            continue;
        }
        if !seen.insert(id.clone()) {
            warn!(path = %path.display(), id = %id, "duplicate preset id skipped");
            continue;
        }
        presets.push(RosterPreset { id, ..preset });
    }
    Ok(presets)
}

pub fn find_preset<'a>(presets: &'a [RosterPreset], key: &str) -> Option<&'a RosterPreset> {
    let key = key.trim();
    presets
        .iter()
        .find(|preset| preset.id.eq_ignore_ascii_case(key))
        .or_else(|| presets.iter().find(|preset| preset.name == key))
}

/// Reads raw roster text from a file, or from stdin when `path` is `-`.
pub fn read_roster(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut body = String::new();
        std::io::stdin()
            .read_to_string(&mut body)
            .context("read roster from stdin")?;
        return Ok(body);
    }
    fs::read_to_string(path).with_context(|| format!("read roster {}", path.display()))
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
