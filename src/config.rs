//! Run configuration and the `package.json` manifest.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DtsError, Result};

pub const DEFAULT_EXTENSIONS: &[&str] = &[".svelte", ".ts", ".js"];

/// Directories never descended into during discovery.
pub const IGNORED_DIRS: &[&str] = &["node_modules"];

pub const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorOptions {
    /// Output path relative to `cwd`. Falls back to the manifest's `types` field.
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Recognized file extensions, each with a leading dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Project root holding `package.json`.
    #[serde(default = "default_cwd")]
    pub cwd: PathBuf,
    /// Drop declarations tagged `@internal` from emitted TypeScript.
    #[serde(default)]
    pub strip_internal: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            output: None,
            extensions: default_extensions(),
            cwd: default_cwd(),
            strip_internal: false,
        }
    }
}

impl GeneratorOptions {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            ..Self::default()
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_strip_internal(mut self, strip_internal: bool) -> Self {
        self.strip_internal = strip_internal;
        self
    }

    /// Replace the extension allow-list. `ts` and `.ts` are both accepted.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| normalize_extension(ext.as_ref()))
            .filter(|ext| ext.len() > 1)
            .collect();
        self
    }

    pub fn accepts_extension(&self, extension: &str) -> bool {
        self.extensions.iter().any(|ext| ext == extension)
    }
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
}

fn default_cwd() -> PathBuf {
    PathBuf::from(".")
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim();
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

/// The fields of `package.json` the generator reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageManifest {
    pub name: String,
    #[serde(default)]
    pub types: Option<String>,
}

impl PackageManifest {
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        let data = fs::read_to_string(&path).map_err(|e| DtsError::io(&path, e))?;
        Self::parse(&data).map_err(|message| DtsError::Manifest { path, message })
    }

    pub fn parse(data: &str) -> std::result::Result<Self, String> {
        let manifest: PackageManifest = serde_json::from_str(data).map_err(|e| e.to_string())?;
        if manifest.name.trim().is_empty() {
            return Err("`name` must not be empty".to_string());
        }
        Ok(manifest)
    }
}
