use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use transcoder::{
    Diagnostics, ExtractionPolicy, TranslationConfig, TranslationUnit, discover,
    extract_discovered, extract_module,
};
use transcoder_syntax::{Reader, reader_for_extension};

/// Translate a Python client library into another language using a token table.
#[derive(Parser)]
#[command(name = "transcoder")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Exit non-zero when any warning or error diagnostic was recorded
    #[arg(long, global = true)]
    deny_diagnostics: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate every function of the given source files
    Translate {
        /// Token table (.toml, .json, .yaml)
        #[arg(short, long)]
        config: PathBuf,

        /// Source files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Discover, extract and translate a whole package directory
    Package {
        /// Token table (.toml, .json, .yaml)
        #[arg(short, long)]
        config: PathBuf,

        /// Skip modules whose name starts with this prefix (repeatable)
        #[arg(long = "exclude")]
        excluded: Vec<String>,

        /// Package name used in reports (defaults to the directory name)
        #[arg(long)]
        package_name: Option<String>,

        /// Emit JSON instead of plain source
        #[arg(long)]
        json: bool,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Package directory
        dir: PathBuf,
    },
}

#[derive(Serialize)]
struct PackageReport<'a> {
    package: &'a str,
    functions: &'a BTreeMap<String, BTreeMap<String, String>>,
    diagnostics: &'a Diagnostics,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TRANSCODER_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Translate { config, files } => run_translate(&config, &files),
        Commands::Package {
            config,
            excluded,
            package_name,
            json,
            output,
            dir,
        } => run_package(
            &config,
            &dir,
            &excluded,
            package_name.as_deref(),
            json,
            output.as_deref(),
        ),
    };

    match result {
        Ok(diagnostics) => {
            let dirty = !diagnostics.is_clean();
            if dirty {
                eprintln!(
                    "{} diagnostics ({} errors, {} warnings)",
                    diagnostics.len(),
                    diagnostics.count_at(transcoder::Level::Error),
                    diagnostics.count_at(transcoder::Level::Warning)
                );
            }
            if dirty && cli.deny_diagnostics {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn reader_for(path: &Path) -> Result<&'static dyn Reader> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    match reader_for_extension(ext) {
        Some(reader) => Ok(reader),
        None => bail!("no reader for {}", path.display()),
    }
}

fn load_config(path: &Path) -> Result<TranslationConfig> {
    TranslationConfig::load(path)
        .with_context(|| format!("loading token table {}", path.display()))
}

fn run_translate(config: &Path, files: &[PathBuf]) -> Result<Diagnostics> {
    let config = load_config(config)?;
    let mut diagnostics = Diagnostics::new();
    let mut stdout = std::io::stdout().lock();

    for file in files {
        let reader = reader_for(file)?;
        let source = std::fs::read_to_string(file)
            .with_context(|| format!("reading {}", file.display()))?;
        let members = reader
            .members(&source)
            .with_context(|| format!("parsing {}", file.display()))?;
        let name = file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();

        let module = extract_module(
            name,
            &members,
            reader,
            ExtractionPolicy::for_module(name),
            &mut diagnostics,
        );
        for unit in module.functions().values() {
            let text = unit.templated_source(&config, &mut diagnostics);
            writeln!(stdout, "{}\n", text)?;
        }
    }

    Ok(diagnostics)
}

fn run_package(
    config: &Path,
    dir: &Path,
    excluded: &[String],
    package_name: Option<&str>,
    json: bool,
    output: Option<&Path>,
) -> Result<Diagnostics> {
    let config = load_config(config)?;
    let reader = reader_for_extension("py").context("python reader not registered")?;
    let package = match package_name {
        Some(name) => name.to_string(),
        None => dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("package")
            .to_string(),
    };

    let mut diagnostics = Diagnostics::new();
    let modules = discover(dir, excluded, reader.extensions(), &mut diagnostics)
        .with_context(|| format!("discovering package {}", package))?;
    let units = extract_discovered(&modules, reader, &mut diagnostics);
    tracing::info!(
        package = %package,
        modules = modules.len(),
        functions = units.function_count(),
        "extracted package"
    );

    let translation = units.translate(&config);
    diagnostics.extend(translation.diagnostics);

    let rendered = if json {
        let report = PackageReport {
            package: &package,
            functions: &translation.functions,
            diagnostics: &diagnostics,
        };
        serde_json::to_string_pretty(&report)?
    } else {
        let mut out = String::new();
        for (module, functions) in &translation.functions {
            tracing::debug!(module = %module, functions = functions.len(), "rendering module");
            for text in functions.values() {
                out.push_str(text);
                out.push_str("\n\n");
            }
        }
        out
    };

    match output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("writing {}", path.display()))?,
        None => print!("{}", rendered),
    }

    Ok(diagnostics)
}
