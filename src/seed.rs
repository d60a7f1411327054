// 🌱 Seed Files - preload a registry from JSON
//
// A seed file is a JSON array of entry payloads in the same shape the
// `/entry` endpoint accepts. Entries are added in file order, so forward
// references are fine and duplicates are rejected just like over HTTP.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::registry::Registry;

/// Load every entry of a seed file into `registry`.
///
/// Stops at the first rejected entry; entries before it stay registered.
/// Returns the number of entries added.
pub fn load_seed<P: AsRef<Path>>(registry: &Registry, path: P) -> Result<usize> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file: {:?}", path))?;

    let payloads: Vec<Value> = serde_json::from_str(&content)
        .with_context(|| format!("Seed file is not a JSON array of entries: {:?}", path))?;

    for (index, payload) in payloads.iter().enumerate() {
        registry
            .add(payload)
            .with_context(|| format!("Seed entry #{} rejected", index))?;
    }

    tracing::info!(path = %path.display(), entries = payloads.len(), "seed loaded");
    Ok(payloads.len())
}
