//! Filesystem store for mapping documents.
//!
//! Mappings are stored as JSON files named after the mapping. Deleting a
//! mapping moves it to a `_trash` subdirectory rather than removing it, so a
//! misclick is recoverable. Malformed files are skipped when listing, never
//! surfaced as errors.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};

use csvcmp_model::{MappingSpec, MappingSummary};

const TRASH_DIR: &str = "_trash";

/// Directory-backed store of mapping documents.
#[derive(Debug, Clone)]
pub struct MappingStore {
    base_dir: PathBuf,
}

impl MappingStore {
    /// Opens (creating if needed) a store at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)
            .with_context(|| format!("create mapping store: {}", base_dir.display()))?;
        Ok(Self { base_dir })
    }

    /// The store's directory.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Saves a mapping document, stamping `created_at` if unset.
    ///
    /// Returns the path the document was written to.
    pub fn save(&self, spec: &MappingSpec) -> Result<PathBuf> {
        let mut spec = spec.clone();
        if spec.meta.created_at.is_none() {
            spec.meta.created_at = Some(timestamp());
        }
        let path = self.mapping_path(&spec.meta.name);
        let json = serde_json::to_string_pretty(&spec)
            .with_context(|| format!("serialize mapping '{}'", spec.meta.name))?;
        fs::write(&path, json).with_context(|| format!("write mapping: {}", path.display()))?;
        tracing::debug!(name = %spec.meta.name, path = %path.display(), "saved mapping");
        Ok(path)
    }

    /// Loads a mapping document by name. `None` if it does not exist.
    pub fn load(&self, name: &str) -> Result<Option<MappingSpec>> {
        let path = self.mapping_path(name);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("read mapping: {}", path.display()))?;
        let spec: MappingSpec = serde_json::from_str(&contents)
            .with_context(|| format!("parse mapping: {}", path.display()))?;
        Ok(Some(spec))
    }

    /// Renders a mapping document as pretty JSON, the copy/export surface.
    pub fn export(&self, name: &str) -> Result<Option<String>> {
        let Some(spec) = self.load(name)? else {
            return Ok(None);
        };
        let json = serde_json::to_string_pretty(&spec)
            .with_context(|| format!("serialize mapping '{name}'"))?;
        Ok(Some(json))
    }

    /// Lists mapping names, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.base_dir)
            .with_context(|| format!("read mapping store: {}", self.base_dir.display()))?
        {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Derives summaries for every readable mapping in the store.
    ///
    /// Unreadable or malformed files are skipped; they show up as missing
    /// entries, never as errors.
    pub fn summaries(&self) -> Result<Vec<MappingSummary>> {
        let mut summaries = Vec::new();
        for name in self.list()? {
            let path = self.mapping_path(&name);
            let Ok(contents) = fs::read_to_string(&path) else {
                continue;
            };
            if let Ok(spec) = serde_json::from_str::<MappingSpec>(&contents) {
                let mut summary = spec.summary();
                // The store name wins over whatever the document claims.
                summary.name = name;
                summaries.push(summary);
            } else {
                tracing::debug!(path = %path.display(), "skipping malformed mapping");
            }
        }
        Ok(summaries)
    }

    /// Moves a mapping to the trash subdirectory. Returns false if absent.
    pub fn delete(&self, name: &str) -> Result<bool> {
        let path = self.mapping_path(name);
        if !path.exists() {
            return Ok(false);
        }
        let trash = self.base_dir.join(TRASH_DIR);
        fs::create_dir_all(&trash)
            .with_context(|| format!("create trash dir: {}", trash.display()))?;
        let target = trash.join(path.file_name().unwrap_or_default());
        fs::rename(&path, &target)
            .with_context(|| format!("trash mapping: {}", path.display()))?;
        Ok(true)
    }

    /// True if a mapping with this name exists.
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.mapping_path(name).exists()
    }

    fn mapping_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", sanitize_name(name)))
    }
}

/// Restricts a mapping name to filename-safe characters.
fn sanitize_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.') {
                ch
            } else {
                '_'
            }
        })
        .collect()
}

fn timestamp() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format_timestamp(secs)
}

/// Approximate ISO 8601 stamp from epoch seconds. Month and day come from
/// fixed-length divisions, clamped so late-year seconds never produce a
/// month 13 or day past 31.
fn format_timestamp(secs: u64) -> String {
    let month = ((secs % 31536000) / 2592000 + 1).min(12);
    let day = ((secs % 2592000) / 86400 + 1).min(31);
    format!(
        "{}-{month:02}-{day:02}T{:02}:{:02}:{:02}Z",
        1970 + secs / 31536000,
        (secs % 86400) / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_path_separators() {
        assert_eq!(sanitize_name("../etc/passwd"), ".._etc_passwd");
        assert_eq!(sanitize_name("orders v2"), "orders_v2");
        assert_eq!(sanitize_name("plain-name_1"), "plain-name_1");
    }

    #[test]
    fn timestamp_fields_stay_in_calendar_range() {
        assert_eq!(format_timestamp(0), "1970-01-01T00:00:00Z");
        // Last second of the fixed-length year lands past twelve 30-day
        // months; the month must clamp to 12 instead of reading 13.
        assert_eq!(format_timestamp(31535999), "1970-12-05T23:59:59Z");
    }
}
