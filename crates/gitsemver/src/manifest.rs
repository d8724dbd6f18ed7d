//! Stamping a derived version into a Cargo manifest.
//!
//! Edits go through `toml_edit` so comments, ordering and formatting of the
//! rest of the file survive.

use anyhow::{Context, Result};
use std::path::Path;
use toml_edit::DocumentMut;

/// Set the package version of the manifest at `path`.
///
/// Updates `[package] version` when present, otherwise
/// `[workspace.package] version`.
pub fn stamp_manifest(path: &Path, version: &str) -> Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {}", path.display()))?;

    let stamped = stamp_str(&contents, version)
        .with_context(|| format!("Failed to update manifest: {}", path.display()))?;

    std::fs::write(path, stamped)
        .with_context(|| format!("Failed to write manifest: {}", path.display()))?;

    tracing::info!("Stamped version {} into {}", version, path.display());
    Ok(())
}

/// Return `contents` with its package version replaced by `version`.
pub fn stamp_str(contents: &str, version: &str) -> Result<String> {
    let mut doc: DocumentMut = contents.parse().context("Manifest is not valid TOML")?;

    let package = if doc.get("package").is_some_and(|p| p.is_table_like()) {
        &mut doc["package"]
    } else if doc
        .get("workspace")
        .and_then(|w| w.get("package"))
        .is_some_and(|p| p.is_table_like())
    {
        &mut doc["workspace"]["package"]
    } else {
        anyhow::bail!("Manifest has neither [package] nor [workspace.package]");
    };

    package["version"] = toml_edit::value(version);
    Ok(doc.to_string())
}
