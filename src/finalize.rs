//! Finalize Module for Emadocs Compiler
//!
//! Writes the three compiled artifacts of one document to disk.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::compile::CompileResult;
use crate::error::{EmaError, Result};

pub const MARKUP_FILE: &str = "index.html";
pub const STYLE_FILE: &str = "styles.css";
pub const SCRIPT_FILE: &str = "script.js";

/// Asset directories the generated pages link to, relative to the output root.
pub const ASSET_DIRS: [&str; 2] = ["css", "js"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputPaths {
    pub markup: PathBuf,
    pub style: PathBuf,
    pub script: PathBuf,
}

/// Write `index.html`, `styles.css` and `script.js` into `dir`, creating it.
pub fn write_outputs(dir: &Path, result: &CompileResult) -> Result<OutputPaths> {
    fs::create_dir_all(dir).map_err(|e| EmaError::write(dir, e))?;

    let paths = OutputPaths {
        markup: dir.join(MARKUP_FILE),
        style: dir.join(STYLE_FILE),
        script: dir.join(SCRIPT_FILE),
    };

    for (path, contents) in [
        (&paths.markup, &result.markup),
        (&paths.style, &result.style),
        (&paths.script, &result.script),
    ] {
        fs::write(path, contents).map_err(|e| EmaError::write(path, e))?;
    }

    tracing::debug!(dir = %dir.display(), "wrote outputs");
    Ok(paths)
}

/// Create the `css/` and `js/` asset directories under the output root.
pub fn prepare_asset_dirs(out_dir: &Path) -> Result<()> {
    for name in ASSET_DIRS {
        let dir = out_dir.join(name);
        fs::create_dir_all(&dir).map_err(|e| EmaError::write(&dir, e))?;
    }
    Ok(())
}

/// Write a single document as a standalone site rooted at `out_dir`: the
/// three outputs plus the asset directories its markup links to.
pub fn write_site(out_dir: &Path, result: &CompileResult) -> Result<OutputPaths> {
    prepare_asset_dirs(out_dir)?;
    write_outputs(out_dir, result)
}
