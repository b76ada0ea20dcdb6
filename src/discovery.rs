//! Discovery Module for Emadocs Compiler
//!
//! Recursively scans a source directory for `.ema` documents and builds them
//! in parallel. Documents share nothing, so each one is compiled on its own
//! rayon worker and a failure in one never stops the others.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use walkdir::WalkDir;

use crate::cache::IncrementalCache;
use crate::compile::{compile, CompileResult};
use crate::config::BuildConfig;
use crate::error::{EmaError, Result};
use crate::finalize::{prepare_asset_dirs, write_outputs};

pub const SOURCE_EXTENSION: &str = "ema";

// ═══════════════════════════════════════════════════════════════════════════════
// REPORT TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub source: PathBuf,
    pub out_dir: PathBuf,
    pub success: bool,
    pub cached: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildReport {
    pub files: Vec<FileReport>,
    pub elapsed_ms: f64,
}

impl BuildReport {
    pub fn succeeded(&self) -> usize {
        self.files.iter().filter(|f| f.success).count()
    }

    pub fn failed(&self) -> usize {
        self.files.len() - self.succeeded()
    }

    pub fn cached(&self) -> usize {
        self.files.iter().filter(|f| f.cached).count()
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.elapsed_ms / 1000.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DISCOVERY
// ═══════════════════════════════════════════════════════════════════════════════

/// Recursively find all .ema files in a directory, sorted by path.
pub fn find_ema_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION))
        .collect();
    files.sort();
    files
}

/// Where a document's outputs go: `index.ema` maps to its own directory,
/// anything else to a directory named after the file stem.
pub fn output_dir_for(src_dir: &Path, out_dir: &Path, file: &Path) -> PathBuf {
    let relative = file
        .strip_prefix(src_dir)
        .unwrap_or_else(|_| Path::new(file.file_name().unwrap_or_default()));
    let stem = relative.with_extension("");

    if stem.file_name().is_some_and(|name| name == "index") {
        match stem.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => out_dir.join(parent),
            _ => out_dir.to_path_buf(),
        }
    } else {
        out_dir.join(stem)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROJECT BUILD
// ═══════════════════════════════════════════════════════════════════════════════

/// Compile every document under `src_dir` and write the outputs under `out_dir`.
pub fn build_project(config: &BuildConfig) -> Result<BuildReport> {
    let start = Instant::now();

    if !config.src_dir.is_dir() {
        return Err(EmaError::MissingSourceDir(config.src_dir.clone()));
    }

    let files = find_ema_files(&config.src_dir);
    tracing::info!(
        count = files.len(),
        src = %config.src_dir.display(),
        "discovered sources"
    );

    prepare_asset_dirs(&config.out_dir)?;
    let cache = config.cache.then(|| IncrementalCache::new(&config.out_dir));

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs.unwrap_or(0))
        .build()?;

    let targets = assign_output_dirs(&files, config);
    let reports: Vec<FileReport> = pool.install(|| {
        targets
            .par_iter()
            .map(|target| match target {
                Target::Build { file, out_dir } => build_file(file, out_dir, config, cache.as_ref()),
                Target::Conflict { file, out_dir, owner } => conflict_report(file, out_dir, owner),
            })
            .collect()
    });

    let report = BuildReport {
        files: reports,
        elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
    };
    tracing::info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        cached = report.cached(),
        elapsed_ms = report.elapsed_ms,
        "build finished"
    );
    Ok(report)
}

enum Target<'a> {
    Build {
        file: &'a Path,
        out_dir: PathBuf,
    },
    Conflict {
        file: &'a Path,
        out_dir: PathBuf,
        owner: &'a Path,
    },
}

/// Pair each file with its output directory. The first file in path order
/// owns a directory; later files mapping to it are not built.
fn assign_output_dirs<'a>(files: &'a [PathBuf], config: &BuildConfig) -> Vec<Target<'a>> {
    let mut owners: HashMap<PathBuf, &'a Path> = HashMap::with_capacity(files.len());
    files
        .iter()
        .map(|file| {
            let out_dir = output_dir_for(&config.src_dir, &config.out_dir, file);
            match owners.get(&out_dir).copied() {
                Some(owner) => Target::Conflict {
                    file,
                    out_dir,
                    owner,
                },
                None => {
                    owners.insert(out_dir.clone(), file);
                    Target::Build { file, out_dir }
                }
            }
        })
        .collect()
}

fn conflict_report(file: &Path, out_dir: &Path, owner: &Path) -> FileReport {
    let message = format!(
        "output directory {} is already used by {}",
        out_dir.display(),
        owner.display()
    );
    tracing::warn!(file = %file.display(), "{}", message);
    FileReport {
        source: file.to_path_buf(),
        out_dir: out_dir.to_path_buf(),
        success: false,
        cached: false,
        errors: vec![message],
        warnings: Vec::new(),
    }
}

fn build_file(
    file: &Path,
    out_dir: &Path,
    config: &BuildConfig,
    cache: Option<&IncrementalCache>,
) -> FileReport {
    let key = file
        .strip_prefix(&config.src_dir)
        .unwrap_or(file)
        .to_string_lossy()
        .into_owned();

    let mut report = FileReport {
        source: file.to_path_buf(),
        out_dir: out_dir.to_path_buf(),
        success: false,
        cached: false,
        errors: Vec::new(),
        warnings: Vec::new(),
    };

    let source = match fs::read_to_string(file) {
        Ok(source) => source,
        Err(e) => {
            let err = EmaError::read(file, e);
            tracing::warn!("{}", err);
            report.errors.push(err.to_string());
            return report;
        }
    };

    let options = &config.compiler;
    let cached = cache.and_then(|c| c.get(&key, &source, options));
    report.cached = cached.is_some();
    let result: CompileResult = match cached {
        Some(result) => result,
        None => {
            let result = compile(&source, &key, options);
            if let Some(cache) = cache {
                cache.set(&key, &source, options, &result);
            }
            result
        }
    };

    report.warnings = result.warnings.clone();
    report.errors = result.errors.clone();
    report.success = result.success;

    if result.success {
        if let Err(e) = write_outputs(out_dir, &result) {
            tracing::warn!("{}", e);
            report.errors.push(e.to_string());
            report.success = false;
        }
    }

    tracing::debug!(file = %key, success = report.success, cached = report.cached, "built");
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_dirs_follow_source_layout() {
        let src = Path::new("/p/src");
        let out = Path::new("/p/dist");
        assert_eq!(output_dir_for(src, out, Path::new("/p/src/index.ema")), PathBuf::from("/p/dist"));
        assert_eq!(
            output_dir_for(src, out, Path::new("/p/src/about.ema")),
            PathBuf::from("/p/dist/about")
        );
        assert_eq!(
            output_dir_for(src, out, Path::new("/p/src/blog/post.ema")),
            PathBuf::from("/p/dist/blog/post")
        );
        assert_eq!(
            output_dir_for(src, out, Path::new("/p/src/blog/index.ema")),
            PathBuf::from("/p/dist/blog")
        );
    }

    #[test]
    fn file_outside_src_uses_its_name() {
        let out = Path::new("/dist");
        assert_eq!(
            output_dir_for(Path::new("/src"), out, Path::new("/elsewhere/docs.ema")),
            PathBuf::from("/dist/docs")
        );
    }
}
