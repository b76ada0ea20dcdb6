//! Emadocs CLI
//!
//! Compile single documents, build whole projects, or dump the token stream
//! and syntax tree of a document.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;

use emadocs_compiler::{
    build_project, compile_file, init_project, parse, tokenize, write_site, BuildConfig,
    CompileOptions, EmaError, CONFIG_FILE_NAME,
};

mod logging;

use logging::{LogFormat, LogLevel};

#[derive(Parser)]
#[command(
    name = "emadocs",
    about = "Compile Emadocs documents into HTML, CSS and JavaScript",
    version
)]
struct Cli {
    /// Log verbosity
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value = "compact")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile one document and write index.html, styles.css and script.js
    Compile(CompileArgs),
    /// Compile every .ema document of a project
    Build(BuildArgs),
    /// Create a new project directory with a starter page
    Init {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Print the token stream of a document as JSON
    Tokens {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
    /// Print the syntax tree of a document as JSON
    Ast {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
}

#[derive(Args)]
struct CompileArgs {
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = "dist")]
    output: PathBuf,

    /// Request minified output (not supported, produces a warning)
    #[arg(long)]
    minify: bool,

    /// Request a source map (not supported, produces a warning)
    #[arg(long)]
    sourcemap: bool,
}

#[derive(Args)]
struct BuildArgs {
    /// Project config file
    #[arg(short, long, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Source directory (overrides the config file)
    #[arg(long)]
    src: Option<PathBuf>,

    /// Output directory (overrides the config file)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Recompile everything
    #[arg(long)]
    no_cache: bool,

    /// Worker threads
    #[arg(short, long)]
    jobs: Option<usize>,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_level, cli.log_format);

    let code = match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };
    process::exit(code);
}

fn run(command: Command) -> Result<i32, EmaError> {
    match command {
        Command::Compile(args) => run_compile(args),
        Command::Build(args) => run_build(args),
        Command::Init { name } => {
            let root = init_project(Path::new("."), &name)?;
            println!("Created {}", root.display());
            println!("  cd {} && emadocs build", name);
            Ok(0)
        }
        Command::Tokens { input } => {
            let source = read(&input)?;
            print_json(&tokenize(&source));
            Ok(0)
        }
        Command::Ast { input } => {
            let source = read(&input)?;
            print_json(&parse(&tokenize(&source)));
            Ok(0)
        }
    }
}

fn run_compile(args: CompileArgs) -> Result<i32, EmaError> {
    let options = CompileOptions {
        minify: args.minify,
        sourcemap: args.sourcemap,
        ..CompileOptions::default()
    };

    let result = compile_file(&args.input, &options);
    for warning in &result.warnings {
        eprintln!("warning: {}", warning);
    }
    if !result.success {
        for error in &result.errors {
            eprintln!("error: {}", error);
        }
        return Ok(1);
    }

    let paths = write_site(&args.output, &result)?;
    println!("Compilation successful!");
    println!("  HTML: {}", paths.markup.display());
    println!("  CSS:  {}", paths.style.display());
    println!("  JS:   {}", paths.script.display());
    println!("  Time: {:.2?}", result.elapsed);
    Ok(0)
}

fn run_build(args: BuildArgs) -> Result<i32, EmaError> {
    let root = args
        .config
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    // Paths in the config file are relative to it; flags are relative to the cwd.
    let mut config = BuildConfig::load(&args.config)?.relative_to(&root);
    if let Some(src) = args.src {
        config.src_dir = src;
    }
    if let Some(out) = args.out {
        config.out_dir = out;
    }
    if args.no_cache {
        config.cache = false;
    }
    if args.jobs.is_some() {
        config.jobs = args.jobs;
    }

    let report = build_project(&config)?;
    for file in &report.files {
        let status = match (file.success, file.cached) {
            (true, true) => "cached",
            (true, false) => "ok",
            (false, _) => "FAILED",
        };
        println!("{:>6}  {} -> {}", status, file.source.display(), file.out_dir.display());
        for warning in &file.warnings {
            println!("        warning: {}", warning);
        }
        for error in &file.errors {
            println!("        error: {}", error);
        }
    }
    println!(
        "{} compiled, {} failed, {} from cache in {:.2?}",
        report.succeeded(),
        report.failed(),
        report.cached(),
        report.elapsed()
    );

    Ok(if report.failed() > 0 { 1 } else { 0 })
}

fn read(path: &Path) -> Result<String, EmaError> {
    std::fs::read_to_string(path).map_err(|e| EmaError::read(path, e))
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: {}", e),
    }
}
