//! Configuration file discovery
//!
//! Looks for `formsmith.{toml,yaml,yml,json}` in a single directory. When
//! several exist they are all loaded, later formats overriding earlier ones.

use std::path::{Path, PathBuf};
use tracing::trace;

/// Base name of configuration files.
pub const CONFIG_FILE_STEM: &str = "formsmith";

/// Configuration file format detected from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    /// `.yaml` or `.yml`
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// A discovered configuration file
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub format: ConfigFormat,
}

/// Configuration files present in `dir`, lowest precedence first.
pub fn discover(dir: &Path) -> Vec<ConfigFile> {
    ["toml", "yaml", "yml", "json"]
        .into_iter()
        .filter_map(|ext| {
            let path = dir.join(format!("{CONFIG_FILE_STEM}.{ext}"));
            if !path.is_file() {
                return None;
            }
            trace!(path = %path.display(), "found configuration file");
            ConfigFormat::from_extension(ext).map(|format| ConfigFile { path, format })
        })
        .collect()
}
