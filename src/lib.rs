//! # Emadocs Compiler
//!
//! Translates Emadocs documents (`page`, `component`, `style`, `event`,
//! `state`, `api`, `router`, `layout`, `animation`, `type`, `hook`, `plugin`,
//! `config`, `import`/`export` blocks) into three artifacts: a markup
//! document, a stylesheet and a script.
//!
//! ## Pipeline
//!
//! 1. **Tokenize**: every recognized character becomes part of exactly one
//!    token. Whitespace, newlines and comments are kept; unknown characters
//!    are dropped.
//! 2. **Parse**: recursive descent over the non-trivia tokens. Unknown
//!    tokens are skipped and missing braces are tolerated, so parsing never
//!    fails.
//! 3. **Emit**: one pass over the tree writing markup, style and script.
//!
//! Each stage is a pure function of its input. Documents can be compiled
//! concurrently; [`build_project`] does so with a rayon pool.
//!
//! Only unreadable input makes a compile fail, reported as a single error in
//! [`CompileResult::errors`].

mod ast;
mod cache;
mod compile;
mod config;
mod discovery;
mod emit;
mod error;
mod finalize;
mod lexer;
mod parse;
mod scaffold;
mod token;
mod visitor;

#[cfg(test)]
mod pipeline_tests;

pub use ast::{
    ComponentNode, Construct, ElementNode, EventNode, ExportNode, ExpressionNode, HookNode,
    ImportNode, Node, Program, RouteNode, SourceLocation, TextNode, TypeNode,
};
pub use cache::IncrementalCache;
pub use compile::{compile, compile_file, CompileResult};
pub use config::{BuildConfig, CompileOptions, CONFIG_FILE_NAME};
pub use discovery::{build_project, find_ema_files, output_dir_for, BuildReport, FileReport};
pub use emit::{capitalize, custom_element_tag, emit, EmitOutput};
pub use error::{EmaError, Result};
pub use finalize::{prepare_asset_dirs, write_outputs, write_site, OutputPaths};
pub use lexer::tokenize;
pub use parse::{parse, parse_source, Parser, MAX_NESTING_DEPTH};
pub use scaffold::init_project;
pub use token::{keyword_kind, Token, TokenKind};
pub use visitor::{ConstructStats, NodeVisitor};

#[cfg(feature = "napi")]
pub use compile::{compile_ema_native, tokenize_ema_native};
