//! mdxkit CLI - Build MDX queries and decode cellsets
//!
//! Usage:
//!   mdxkit build <query.toml>
//!   mdxkit decode <cellset.json> [--element-names] [--cell-properties] [--top <n>]
//!   mdxkit select --cube <cube> --rows <selection>... --columns <selection>... [--where DIM=ELEM]...
//!
//! Examples:
//!   mdxkit build queries/sales.toml
//!   mdxkit decode response.json --dimensions Year,Region,Measures --strict
//!   mdxkit select --cube Sales --rows Region:subset=Countries --columns Year:elements=2024,2025 --suppress both

use clap::{Parser, Subcommand};
use mdxkit::cellset::{decode_json, CoordinatePolicy};
use mdxkit::config::Settings;
use mdxkit::mdx::{construct_mdx, DimensionSelection, QueryDefinition, SuppressMode};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mdxkit")]
#[command(about = "mdxkit - Build MDX queries and decode cellsets")]
#[command(version)]
struct Cli {
    /// Config file (overrides MDXKIT_CONFIG and the default locations)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build MDX from a TOML query definition
    Build {
        /// Path to the query definition
        file: PathBuf,
    },

    /// Decode a cellset JSON document into a coordinate-keyed mapping
    Decode {
        /// Path to the cellset JSON
        file: PathBuf,

        /// Key cells by unique names
        #[arg(long, conflicts_with = "element_names")]
        unique_names: bool,

        /// Key cells by bare element names
        #[arg(long)]
        element_names: bool,

        /// Keep full cell objects instead of values
        #[arg(long)]
        cell_properties: bool,

        /// Decode at most this many cells
        #[arg(long)]
        top: Option<usize>,

        /// Fail on coordinates that match no cube dimension
        #[arg(long)]
        strict: bool,

        /// Cube dimension order, overriding the one in the cellset
        #[arg(long, value_delimiter = ',')]
        dimensions: Vec<String>,
    },

    /// Build a classic ON ROWS / ON COLUMNS query from dimension selections
    Select {
        /// Cube name
        #[arg(long)]
        cube: String,

        /// Row selection: DIM, DIM:subset=NAME, DIM:elements=A,B or DIM:expr=MDX
        #[arg(long, required = true)]
        rows: Vec<DimensionSelection>,

        /// Column selection, same forms as --rows
        #[arg(long, required = true)]
        columns: Vec<DimensionSelection>,

        /// Slicer member as DIMENSION=ELEMENT
        #[arg(long = "where", value_parser = parse_context)]
        contexts: Vec<(String, String)>,

        /// NON EMPTY on: none, rows, columns or both
        #[arg(long, default_value = "none")]
        suppress: SuppressMode,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let settings = match load_settings(cli.config.as_ref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Build { file } => cmd_build(file),
        Commands::Decode {
            file,
            unique_names,
            element_names,
            cell_properties,
            top,
            strict,
            dimensions,
        } => {
            let mut options = settings.decode.to_options();
            if unique_names {
                options.elements_unique_names = true;
            }
            if element_names {
                options.elements_unique_names = false;
            }
            if cell_properties {
                options.skip_cell_properties = false;
            }
            if top.is_some() {
                options.top = top;
            }
            if strict {
                options.coordinate_policy = CoordinatePolicy::Strict;
            }
            if !dimensions.is_empty() {
                options.dimension_order = Some(dimensions);
            }
            cmd_decode(file, &options, settings.output.pretty)
        }
        Commands::Select {
            cube,
            rows,
            columns,
            contexts,
            suppress,
        } => {
            println!("{}", construct_mdx(&cube, &rows, &columns, &contexts, suppress));
            ExitCode::SUCCESS
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings, mdxkit::config::SettingsError> {
    match path {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    }
}

fn parse_context(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((dim, elem)) if !dim.trim().is_empty() && !elem.trim().is_empty() => {
            Ok((dim.trim().to_string(), elem.trim().to_string()))
        }
        _ => Err(format!("expected DIMENSION=ELEMENT, got '{}'", s)),
    }
}

fn cmd_build(file: PathBuf) -> ExitCode {
    let result = QueryDefinition::from_file(&file)
        .and_then(|def| def.lower())
        .and_then(|lowered| lowered.to_mdx_strings());

    match result {
        Ok(queries) => {
            for mdx in queries {
                println!("{}", mdx);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error in '{}': {}", file.display(), e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_decode(file: PathBuf, options: &mdxkit::cellset::DecodeOptions, pretty: bool) -> ExitCode {
    let source = match fs::read_to_string(&file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let content = match decode_json(&source, options) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Decode error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let rendered = if pretty {
        serde_json::to_string_pretty(&content.entries)
    } else {
        serde_json::to_string(&content.entries)
    };

    match rendered {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error writing output: {}", e);
            ExitCode::FAILURE
        }
    }
}
