use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

/// Serialize `object` to `<dir>/<name>.yaml`, with `dir` defaulting to `.`.
///
/// Returns the path of the written file.
pub fn write_yaml<T: Serialize>(dir: Option<&Path>, name: &str, object: &T) -> Result<PathBuf> {
    let yaml = serde_yaml::to_string(object)
        .with_context(|| format!("Failed to serialize '{name}' to YAML"))?;
    debug!("Generating YAML file '{name}' with content:\n---\n{yaml}\n---");

    let dir = dir.unwrap_or_else(|| Path::new("."));
    let metadata = fs::metadata(dir)
        .with_context(|| format!("Cannot access output directory '{}'", dir.display()))?;
    if !metadata.is_dir() {
        anyhow::bail!("Path '{}' is not a directory", dir.display());
    }

    let path = dir.join(format!("{name}.yaml"));
    fs::write(&path, yaml).with_context(|| format!("Failed to write '{}'", path.display()))?;
    info!(path = %path.display(), "manifest_written");

    Ok(path)
}
