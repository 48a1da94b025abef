//! Durable registry records
//!
//! The host registry persists as a plain text file: one `address,label`
//! record per line. Mutations rewrite the whole file so the records always
//! match the in-memory list, including after removals.

use std::path::Path;

use tracing::warn;

use crate::registry::HostEntry;

use super::error::StorageResult;

/// Parse registry records from file content.
///
/// Records that do not split into `address,label` are skipped. A file that
/// parses to nothing is simply an empty registry.
pub fn parse_records(content: &str) -> Vec<HostEntry> {
    let mut entries = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once(',') {
            Some((address, label)) if !address.is_empty() => {
                entries.push(HostEntry {
                    address: address.trim().to_string(),
                    label: label.trim().to_string(),
                });
            }
            _ => {
                warn!("skipping malformed registry record: {line:?}");
            }
        }
    }

    entries
}

/// Render registry entries back into file content.
pub fn render_records(entries: &[HostEntry]) -> String {
    let mut out = String::new();

    for entry in entries {
        out.push_str(&entry.address);
        out.push(',');
        out.push_str(&entry.label);
        out.push('\n');
    }

    out
}

/// Load registry records from `path`.
///
/// A missing file is an empty registry, not an error.
pub fn load_records(path: &Path) -> Vec<HostEntry> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_records(&content),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(err) => {
            warn!("failed to read registry file {}: {err}", path.display());
            Vec::new()
        }
    }
}

/// Persist all registry records to `path`, replacing previous content.
pub fn save_records(path: &Path, entries: &[HostEntry]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(path, render_records(entries))?;
    Ok(())
}
