//! Project scaffolding for `emadocs init`
//!
//! Lays out a new project that `build_project` can compile as-is: a config
//! file with default settings, a source directory holding a starter page,
//! and an empty output directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{BuildConfig, CONFIG_FILE_NAME};
use crate::error::{EmaError, Result};

pub const STARTER_FILE: &str = "index.ema";
pub const README_FILE: &str = "README.md";

/// Create the project `name` under `parent` and return its root directory.
pub fn init_project(parent: &Path, name: &str) -> Result<PathBuf> {
    if !is_valid_name(name) {
        return Err(EmaError::InvalidProjectName(name.to_string()));
    }

    let root = parent.join(name);
    if root.exists() {
        return Err(EmaError::ProjectExists(root));
    }

    let config = BuildConfig::default();
    for dir in [&config.src_dir, &config.out_dir] {
        let dir = root.join(dir);
        fs::create_dir_all(&dir).map_err(|e| EmaError::write(&dir, e))?;
    }

    let config_json = serde_json::to_string_pretty(&config).map_err(|source| EmaError::Config {
        path: root.join(CONFIG_FILE_NAME),
        source,
    })?;
    write(&root.join(CONFIG_FILE_NAME), &(config_json + "\n"))?;
    write(&root.join(&config.src_dir).join(STARTER_FILE), &starter_page(name))?;
    write(&root.join(README_FILE), &readme(name))?;

    tracing::info!(project = name, root = %root.display(), "created project");
    Ok(root)
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn write(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| EmaError::write(path, e))
}

fn starter_page(name: &str) -> String {
    format!(
        r#"page Home title="{name}" {{
  layout Main {{ }}
}}

component Welcome {{ }}

style home {{ }}
"#
    )
}

fn readme(name: &str) -> String {
    format!(
        "# {name}\n\n\
         Built with Emadocs.\n\n\
         ```sh\n\
         emadocs build\n\
         ```\n\n\
         Sources live in `src/`; compiled pages are written to `dist/`.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starter_layout() {
        let dir = tempfile::tempdir().unwrap();
        let root = init_project(dir.path(), "my-docs").unwrap();

        assert_eq!(root, dir.path().join("my-docs"));
        assert!(root.join("src").join(STARTER_FILE).is_file());
        assert!(root.join("dist").is_dir());
        assert!(root.join(README_FILE).is_file());

        let config = BuildConfig::load(&root.join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, BuildConfig::default());
    }

    #[test]
    fn existing_directory_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("taken");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("keep.txt"), "mine").unwrap();

        let err = init_project(dir.path(), "taken").unwrap_err();
        assert!(matches!(err, EmaError::ProjectExists(_)));
        assert_eq!(fs::read_to_string(root.join("keep.txt")).unwrap(), "mine");
        assert!(!root.join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn rejects_path_like_names() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["", "../up", "a/b", "quote\"d", "-flag"] {
            let err = init_project(dir.path(), name).unwrap_err();
            assert!(matches!(err, EmaError::InvalidProjectName(_)), "{name}");
        }
    }
}
