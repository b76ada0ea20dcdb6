//! Compile entry points
//!
//! tokenize -> parse -> emit, wrapped with timing, warnings and the
//! failure path for unreadable input.

#[cfg(feature = "napi")]
use napi_derive::napi;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::config::CompileOptions;
use crate::emit::emit;
use crate::lexer::tokenize;
use crate::parse::{Parser, MAX_NESTING_DEPTH};
use crate::visitor::ConstructStats;

pub const MINIFY_UNSUPPORTED: &str = "minification is not supported; output is not minified";
pub const SOURCEMAP_UNSUPPORTED: &str = "source maps are not supported; no map was generated";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileResult {
    pub success: bool,
    pub markup: String,
    pub style: String,
    pub script: String,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    #[serde(rename = "elapsedMs", with = "duration_ms")]
    pub elapsed: Duration,
}

impl CompileResult {
    /// A result carrying a single catastrophic error and no output.
    pub fn failure(error: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            success: false,
            markup: String::new(),
            style: String::new(),
            script: String::new(),
            errors: vec![error.into()],
            warnings: Vec::new(),
            elapsed,
        }
    }
}

/// Compile one in-memory document. Always returns a result; grammar problems
/// are recovered silently, so `success` is true for any text input.
#[tracing::instrument(level = "debug", skip(source, options), fields(bytes = source.len()))]
pub fn compile(source: &str, file_name: &str, options: &CompileOptions) -> CompileResult {
    let start = Instant::now();

    let tokens = tokenize(source);
    tracing::debug!(tokens = tokens.len(), "tokenized");

    let mut parser = Parser::new(&tokens);
    let program = parser.parse_program();
    let depth_limited = parser.depth_limited();
    let stats = ConstructStats::collect(&program);
    tracing::debug!(
        statements = program.statements.len(),
        nodes = stats.total(),
        depth = stats.max_depth,
        "parsed"
    );

    let output = emit(&program);
    let mut warnings = collect_warnings(&stats, options);
    if depth_limited {
        warnings.push(format!(
            "blocks nested deeper than {} levels were skipped",
            MAX_NESTING_DEPTH
        ));
    }
    for warning in &warnings {
        tracing::debug!(file = file_name, "{}", warning);
    }

    let elapsed = start.elapsed();
    tracing::debug!(elapsed_ms = elapsed.as_secs_f64() * 1000.0, "emitted");

    CompileResult {
        success: true,
        markup: output.markup,
        style: output.style,
        script: output.script,
        errors: Vec::new(),
        warnings,
        elapsed,
    }
}

/// Read and compile a file. Unreadable or non-UTF-8 input gives `success = false`.
pub fn compile_file(path: &Path, options: &CompileOptions) -> CompileResult {
    let start = Instant::now();
    match read_source(path) {
        Ok(source) => compile(&source, &path.display().to_string(), options),
        Err(message) => {
            tracing::warn!(path = %path.display(), "{}", message);
            CompileResult::failure(message, start.elapsed())
        }
    }
}

fn read_source(path: &Path) -> Result<String, String> {
    let bytes = fs::read(path).map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    String::from_utf8(bytes)
        .map_err(|e| format!("{} is not valid UTF-8: {}", path.display(), e.utf8_error()))
}

fn collect_warnings(stats: &ConstructStats, options: &CompileOptions) -> Vec<String> {
    let mut warnings = Vec::new();
    if options.minify {
        warnings.push(MINIFY_UNSUPPORTED.to_string());
    }
    if options.sourcemap {
        warnings.push(SOURCEMAP_UNSUPPORTED.to_string());
    }
    let pages = stats.count("page");
    if pages > 1 {
        warnings.push(format!(
            "{} page blocks found; their markup documents are concatenated",
            pages
        ));
    }
    warnings
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64() * 1000.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let ms = f64::deserialize(d)?;
        Ok(Duration::from_secs_f64(ms.max(0.0) / 1000.0))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI EXPORTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
#[napi]
pub fn compile_ema_native(
    source: String,
    file_name: String,
    options_json: Option<String>,
) -> napi::Result<serde_json::Value> {
    let options = match options_json {
        Some(json) => serde_json::from_str::<CompileOptions>(&json)
            .map_err(|e| napi::Error::from_reason(format!("invalid options: {}", e)))?,
        None => CompileOptions::default(),
    };
    let result = compile(&source, &file_name, &options);
    serde_json::to_value(result).map_err(|e| napi::Error::from_reason(e.to_string()))
}

#[cfg(feature = "napi")]
#[napi]
pub fn tokenize_ema_native(source: String) -> napi::Result<serde_json::Value> {
    serde_json::to_value(tokenize(&source)).map_err(|e| napi::Error::from_reason(e.to_string()))
}
