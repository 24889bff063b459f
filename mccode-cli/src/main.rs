//!
//! This binary converts McCode monitor files into histogram payloads and
//! file-writer structure descriptors.
#![allow(clippy::uninlined_format_args, clippy::too_many_lines)]

use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, LevelFilter};
use rayon::prelude::*;

use mccode_core::{DatFile, HistogramSource, PayloadOptions, Schema};
use mccode_io::{read_mccode_dat, structure_for_dimensions, to_json, StructureOptions};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("{0}")]
    McCodeIo(#[from] mccode_io::Error),

    #[error("{0}")]
    Core(#[from] mccode_core::Error),
}

/// Streaming schema selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Module {
    /// Unsigned integer histogram schema
    Hs00,
    /// Signed integer histogram schema
    Hs01,
}

impl From<Module> for Schema {
    fn from(module: Module) -> Self {
        match module {
            Module::Hs00 => Schema::Hs00,
            Module::Hs01 => Schema::Hs01,
        }
    }
}

/// McStas/McXtrace monitor file to histogram message converter.
#[derive(Parser)]
#[command(name = "mccode-to-kafka")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the header, shape and axes of a McCode data file
    Info {
        /// Input .dat file
        input: PathBuf,
    },

    /// Print the histogram payload of each file as JSON
    Payload {
        /// Input .dat file(s)
        #[arg(required = true)]
        input: Vec<PathBuf>,

        /// Source name (default: the file path)
        #[arg(long)]
        source: Option<String>,

        /// Free-text information attached to each payload
        #[arg(long)]
        info: Option<String>,

        /// Timestamp in nanoseconds since the epoch (default: now)
        #[arg(long)]
        timestamp: Option<u64>,

        /// Divide counts and errors by the monitor counts N
        #[arg(short, long)]
        normalise: bool,

        /// Streaming schema
        #[arg(short, long, value_enum, default_value = "hs00")]
        module: Module,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Print the file-writer structure descriptor for a file's axes
    Structure {
        /// Input .dat file
        input: PathBuf,

        /// Topic the histograms are published on
        #[arg(short, long)]
        topic: String,

        /// Source name (default: mccode-to-kafka)
        #[arg(long)]
        source: Option<String>,

        /// Streaming schema
        #[arg(short, long, value_enum, default_value = "hs00")]
        module: Module,

        /// Prefix for the axis dataset names
        #[arg(long)]
        dataset_prefix: Option<String>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    match cli.command {
        Commands::Info { input } => {
            let file = read_mccode_dat(&input)?;
            print_info(&file)?;
        }

        Commands::Payload {
            input,
            source,
            info,
            timestamp,
            normalise,
            module,
            pretty,
        } => {
            let options = PayloadOptions {
                source,
                info,
                timestamp,
                normalise,
            };
            let schema = Schema::from(module);
            debug!("converting {} file(s) with {:?}", input.len(), options);

            // Files are independent; output keeps the input order.
            let documents = input
                .par_iter()
                .map(|path| -> Result<String> {
                    let file = read_mccode_dat(path)?;
                    let payload = file.to_payload(schema, &options)?;
                    Ok(to_json(&payload, pretty)?)
                })
                .collect::<Result<Vec<_>>>()?;

            for document in documents {
                println!("{}", document);
            }
        }

        Commands::Structure {
            input,
            topic,
            source,
            module,
            dataset_prefix,
            pretty,
        } => {
            let file = read_mccode_dat(&input)?;
            let options = StructureOptions {
                topic,
                source,
                module: module.into(),
                dataset_prefix,
            };
            let structure = structure_for_dimensions(&file.dim_metadata()?, &options);
            mccode_io::write_json(io::stdout().lock(), &structure, pretty)?;
        }
    }

    Ok(())
}

fn print_info(file: &DatFile) -> Result<()> {
    let header = file.header();

    println!("File: {}", header.source().display());
    println!("Type: {}", header.type_tag()?);
    println!("Dimensions: {}", file.ndim());
    println!("Data shape: {:?}", file.data().shape());
    println!("Variables: {}", header.variables().join(" "));

    let mut parameters: Vec<_> = header.parameters().iter().collect();
    parameters.sort();
    if !parameters.is_empty() {
        println!("Parameters:");
        for (name, value) in parameters {
            println!("  {} = {}", name, value);
        }
    }

    for (axis, dimension) in ["x", "y"].iter().zip(file.dim_metadata()?) {
        let first = dimension.bin_boundaries.first().copied().unwrap_or(f64::NAN);
        let last = dimension.bin_boundaries.last().copied().unwrap_or(f64::NAN);
        println!(
            "Axis {}: {} bins, {} [{}], edges {} - {}",
            axis, dimension.length, dimension.label, dimension.unit, first, last
        );
    }

    Ok(())
}
