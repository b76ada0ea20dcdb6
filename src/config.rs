//! Compiler and project configuration
//!
//! `CompileOptions` travels with every compile call. `BuildConfig` describes a
//! whole project and is read from `emadocs.json`.

#[cfg(feature = "napi")]
use napi_derive::napi;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{EmaError, Result};

pub const CONFIG_FILE_NAME: &str = "emadocs.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    /// Accepted, not implemented. Produces a warning.
    pub minify: bool,
    /// Accepted, not implemented. Produces a warning.
    pub sourcemap: bool,
    pub treeshaking: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            minify: false,
            sourcemap: false,
            treeshaking: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildConfig {
    pub src_dir: PathBuf,
    pub out_dir: PathBuf,
    pub compiler: CompileOptions,
    pub cache: bool,
    /// Worker threads for the build. `None` lets rayon decide.
    pub jobs: Option<usize>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            src_dir: PathBuf::from("src"),
            out_dir: PathBuf::from("dist"),
            compiler: CompileOptions::default(),
            cache: true,
            jobs: None,
        }
    }
}

impl BuildConfig {
    /// Load a config file. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(EmaError::read(path, e)),
        };
        Self::from_json(&data).map_err(|source| EmaError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(data: &str) -> serde_json::Result<Self> {
        serde_json::from_str(data)
    }

    /// Resolve relative source and output directories against `root`.
    pub fn relative_to(mut self, root: &Path) -> Self {
        if self.src_dir.is_relative() {
            self.src_dir = root.join(&self.src_dir);
        }
        if self.out_dir.is_relative() {
            self.out_dir = root.join(&self.out_dir);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let config = BuildConfig::from_json(r#"{ "outDir": "public", "compiler": { "minify": true } }"#)
            .unwrap();
        assert_eq!(config.src_dir, PathBuf::from("src"));
        assert_eq!(config.out_dir, PathBuf::from("public"));
        assert!(config.compiler.minify);
        assert!(config.compiler.treeshaking);
        assert!(config.cache);
        assert_eq!(config.jobs, None);
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = BuildConfig::load(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, BuildConfig::default());
    }

    #[test]
    fn invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();
        let err = BuildConfig::load(&path).unwrap_err();
        assert!(matches!(err, EmaError::Config { .. }));
        assert!(err.to_string().contains("emadocs.json"));
    }

    #[test]
    fn relative_dirs_resolve_against_root() {
        let root = Path::new("/project");
        let config = BuildConfig {
            out_dir: PathBuf::from("/abs/out"),
            ..BuildConfig::default()
        }
        .relative_to(root);
        assert_eq!(config.src_dir, PathBuf::from("/project/src"));
        assert_eq!(config.out_dir, PathBuf::from("/abs/out"));
    }
}
