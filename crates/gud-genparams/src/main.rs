//! gud parameter header generator
//!
//! Renders the declaration header of the gud package from its parameter
//! description table, and checks that a header on disk is intact and up to
//! date.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p gud-genparams -- render --output pkg/gud/GUD_GENPARAMS.h
//! cargo run -p gud-genparams -- check --header pkg/gud/GUD_GENPARAMS.h
//! ```

use clap::{Parser, Subcommand};
use gud_core::codegen::{is_current, render_header};
use gud_core::errors::{GudError, GudResult};
use gud_core::table::DescriptionTable;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Generate and check the gud parameter declaration header
#[derive(Parser, Debug)]
#[command(name = "gud-genparams")]
#[command(about = "Generate the gud parameter declaration header from its description table")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the header
    Render {
        /// Description table (TOML); the built-in gud table if omitted
        #[arg(short, long)]
        table: Option<PathBuf>,

        /// Output file; standard output if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check a header matches its checksum and the description table
    Check {
        /// Header to check
        #[arg(long)]
        header: PathBuf,

        /// Description table (TOML); the built-in gud table if omitted
        #[arg(short, long)]
        table: Option<PathBuf>,
    },
}

fn load_table(path: Option<&Path>) -> GudResult<DescriptionTable> {
    match path {
        Some(path) => DescriptionTable::from_file(path),
        None => gud::table::gud_table(),
    }
}

fn render(table: Option<&Path>, output: Option<&Path>) -> GudResult<()> {
    let header = render_header(&load_table(table)?)?;
    match output {
        Some(path) => {
            fs::write(path, header)?;
            println!("Wrote {}", path.display());
        }
        None => print!("{header}"),
    }
    Ok(())
}

/// Returns whether the header is current
fn check(header: &Path, table: Option<&Path>) -> GudResult<bool> {
    let text = fs::read_to_string(header)?;
    let table = load_table(table)?;
    is_current(&text, &table)
}

fn main() -> ExitCode {
    let args = Args::parse();

    match args.command {
        Command::Render { table, output } => {
            if let Err(e) = render(table.as_deref(), output.as_deref()) {
                eprintln!("Failed to render header: {e}");
                return ExitCode::FAILURE;
            }
        }
        Command::Check { header, table } => match check(&header, table.as_deref()) {
            Ok(true) => println!("{} is up to date", header.display()),
            Ok(false) => {
                eprintln!(
                    "{} is out of date, regenerate it with `gud-genparams render`",
                    header.display()
                );
                return ExitCode::FAILURE;
            }
            Err(e @ GudError::ChecksumMismatch { .. }) => {
                eprintln!("{}: {e}", header.display());
                eprintln!("Edit the description table instead of the generated block");
                return ExitCode::FAILURE;
            }
            Err(e) => {
                eprintln!("Failed to check {}: {e}", header.display());
                return ExitCode::FAILURE;
            }
        },
    }
    ExitCode::SUCCESS
}
