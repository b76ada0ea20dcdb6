use crate::compile::CompileResult;
use crate::config::CompileOptions;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

pub const CACHE_DIR_NAME: &str = ".emadocs-cache";

#[derive(Serialize, Deserialize)]
pub struct CacheEntry {
    pub hash: String,
    pub result: CompileResult,
}

/// Compile results keyed by source path, validated by a hash of the source
/// text and the options it was compiled with.
pub struct IncrementalCache {
    cache_dir: PathBuf,
}

impl IncrementalCache {
    /// Cache rooted at `<out_dir>/.emadocs-cache`.
    pub fn new(out_dir: &Path) -> Self {
        let cache_dir = out_dir.join(CACHE_DIR_NAME);
        if !cache_dir.exists() {
            fs::create_dir_all(&cache_dir).ok();
        }
        Self { cache_dir }
    }

    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn compute_hash(source: &str, options: &CompileOptions) -> String {
        let mut hasher = Sha256::new();
        hasher.update(source.as_bytes());
        // Options are part of the key: the same source with new flags recompiles.
        if let Ok(opts) = serde_json::to_vec(options) {
            hasher.update(&opts);
        }
        format!("{:x}", hasher.finalize())
    }

    /// Entry file for a source path, named by the SHA-256 of the path.
    pub(crate) fn get_cache_path(&self, file_path: &str) -> PathBuf {
        let digest = Sha256::digest(file_path.as_bytes());
        self.cache_dir.join(format!("{:x}.json", digest))
    }

    pub fn get(&self, file_path: &str, source: &str, options: &CompileOptions) -> Option<CompileResult> {
        let cache_path = self.get_cache_path(file_path);
        let data = fs::read_to_string(&cache_path).ok()?;

        let entry: CacheEntry = match serde_json::from_str(&data) {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(file = file_path, error = %e, "corrupt cache entry, discarding");
                fs::remove_file(cache_path).ok();
                return None;
            }
        };

        if entry.hash == Self::compute_hash(source, options) {
            Some(entry.result)
        } else {
            None
        }
    }

    /// Store a result. Failed compilations are never cached.
    pub fn set(&self, file_path: &str, source: &str, options: &CompileOptions, result: &CompileResult) {
        if !result.success {
            return;
        }
        let cache_path = self.get_cache_path(file_path);
        let entry = CacheEntry {
            hash: Self::compute_hash(source, options),
            result: result.clone(),
        };

        match serde_json::to_string(&entry) {
            Ok(data) => {
                if let Err(e) = fs::write(&cache_path, data) {
                    tracing::warn!(path = %cache_path.display(), error = %e, "failed to write cache entry");
                }
            }
            Err(e) => tracing::warn!(file = file_path, error = %e, "failed to serialize cache entry"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;

    #[test]
    fn hit_after_set_miss_after_change() {
        let dir = tempfile::tempdir().unwrap();
        let cache = IncrementalCache::new(dir.path());
        let options = CompileOptions::default();
        let source = "component Foo { }";
        let result = compile(source, "foo.ema", &options);

        assert!(cache.get("src/foo.ema", source, &options).is_none());
        cache.set("src/foo.ema", source, &options, &result);

        let hit = cache.get("src/foo.ema", source, &options).unwrap();
        assert_eq!(hit.style, result.style);
        assert_eq!(hit.script, result.script);

        assert!(cache.get("src/foo.ema", "component Bar { }", &options).is_none());
        let minify = CompileOptions {
            minify: true,
            ..CompileOptions::default()
        };
        assert!(cache.get("src/foo.ema", source, &minify).is_none());
    }

    #[test]
    fn corrupt_entry_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let cache = IncrementalCache::new(dir.path());
        let path = cache.get_cache_path("src/bad.ema");
        assert!(path.starts_with(cache.dir()));
        fs::write(&path, "not json").unwrap();

        assert!(cache.get("src/bad.ema", "page P { }", &CompileOptions::default()).is_none());
        assert!(!path.exists());
    }

    #[test]
    fn separator_and_underscore_paths_do_not_share_entries() {
        let dir = tempfile::tempdir().unwrap();
        let cache = IncrementalCache::new(dir.path());
        let options = CompileOptions::default();
        let nested = compile("page Nested { }", "blog/post.ema", &options);
        let flat = compile("page Flat { }", "blog_post.ema", &options);

        cache.set("blog/post.ema", "page Nested { }", &options, &nested);
        cache.set("blog_post.ema", "page Flat { }", &options, &flat);

        assert_ne!(cache.get_cache_path("blog/post.ema"), cache.get_cache_path("blog_post.ema"));
        let hit = cache.get("blog/post.ema", "page Nested { }", &options).unwrap();
        assert_eq!(hit.markup, nested.markup);
        let hit = cache.get("blog_post.ema", "page Flat { }", &options).unwrap();
        assert_eq!(hit.markup, flat.markup);
    }

    #[test]
    fn failures_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let cache = IncrementalCache::new(dir.path());
        let failed = CompileResult::failure("boom", std::time::Duration::ZERO);
        cache.set("x.ema", "", &CompileOptions::default(), &failed);
        assert!(cache.get("x.ema", "", &CompileOptions::default()).is_none());
    }
}
