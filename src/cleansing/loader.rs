//! File-based loading of cleansing rule definitions.
//!
//! A rule file is JSON (`.json`) or YAML (`.yaml` / `.yml`) and holds either a single rule
//! object or a list of rule objects.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use super::rule::CleansingRule;
use crate::error::{RuleError, RuleResult};

/// Supported rule file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFileFormat {
    Json,
    Yaml,
}

impl RuleFileFormat {
    /// Parse a rule file format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_extension)
    }
}

/// Load the rules defined in one file.
pub fn load_rules_from_path(path: impl AsRef<Path>) -> RuleResult<Vec<CleansingRule>> {
    let path = path.as_ref();
    let format = RuleFileFormat::from_path(path).ok_or_else(|| RuleError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let text = fs::read_to_string(path).map_err(|source| RuleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rules = parse_rules_str(&text, format, path)?;
    debug!(path = %path.display(), count = rules.len(), "loaded rule file");
    Ok(rules)
}

/// Parse rule definitions from in-memory text. `origin` is only used in error messages.
pub fn parse_rules_str(
    text: &str,
    format: RuleFileFormat,
    origin: impl AsRef<Path>,
) -> RuleResult<Vec<CleansingRule>> {
    let origin = origin.as_ref();
    let parse_err = |message: String| RuleError::Parse {
        path: origin.to_path_buf(),
        message,
    };

    let document: serde_json::Value = match format {
        RuleFileFormat::Json => serde_json::from_str(text).map_err(|e| parse_err(e.to_string()))?,
        RuleFileFormat::Yaml => serde_yaml::from_str(text).map_err(|e| parse_err(e.to_string()))?,
    };

    let entries = match document {
        serde_json::Value::Null => Vec::new(),
        serde_json::Value::Array(items) => items,
        other => vec![other],
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| {
            if !entry.is_object() {
                return Err(parse_err(format!(
                    "entry {idx} must be a mapping/object"
                )));
            }
            serde_json::from_value::<CleansingRule>(entry)
                .map_err(|e| parse_err(format!("entry {idx}: {e}")))
        })
        .collect()
}

/// Recursively load every rule file under `dir`, in sorted path order.
///
/// Files whose extension is not a rule format are skipped.
pub fn load_rules_from_dir(dir: impl AsRef<Path>) -> RuleResult<Vec<CleansingRule>> {
    let dir = dir.as_ref();
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| RuleError::Io {
            path: e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf()),
            source: e.into(),
        })?;
        if entry.file_type().is_file() && RuleFileFormat::from_path(entry.path()).is_some() {
            paths.push(entry.into_path());
        }
    }
    let rules = load_all(&paths)?;
    info!(dir = %dir.display(), files = paths.len(), rules = rules.len(), "loaded rule directory");
    Ok(rules)
}

/// Load every rule file matching a glob pattern (e.g. `rules/**/*.yaml`).
pub fn load_rules_from_glob(pattern: &str) -> RuleResult<Vec<CleansingRule>> {
    let entries = glob::glob(pattern).map_err(|e| RuleError::Pattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| RuleError::Io {
            path: e.path().to_path_buf(),
            source: e.into_error(),
        })?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    load_all(&paths)
}

fn load_all(paths: &[PathBuf]) -> RuleResult<Vec<CleansingRule>> {
    let mut rules = Vec::new();
    for path in paths {
        rules.extend(load_rules_from_path(path)?);
    }
    Ok(rules)
}
