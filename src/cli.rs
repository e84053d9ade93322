use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Olympic participation analytics over flat CSV exports",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compute each Summer edition's top-8 country attendance shares
    Share(ShareArgs),
    /// Count participation records per country
    Counts(CountsArgs),
    /// Tally gold, silver, and bronze medals per country
    Medals(MedalsArgs),
    /// Show how the logical column roles resolve against a file's header
    Roles(RolesArgs),
}

#[derive(Debug, Args)]
pub struct ShareArgs {
    /// Input CSV file of participation records ('-' for stdin)
    #[arg(short = 'i', long = "input", default_value = "dataset_olympics.csv")]
    pub input: PathBuf,
    /// Output CSV file ('-' for stdout)
    #[arg(
        short = 'o',
        long = "output",
        default_value = "top8_countries_attendance.csv"
    )]
    pub output: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Maximum rows to scan (0 = all)
    #[arg(long, default_value_t = 0)]
    pub limit: usize,
    /// Render the result as an aligned table when writing to stdout
    #[arg(long = "table")]
    pub table: bool,
}

#[derive(Debug, Args)]
pub struct CountsArgs {
    /// Input CSV file of participation records ('-' for stdin)
    #[arg(short = 'i', long = "input", default_value = "dataset_olympics.csv")]
    pub input: PathBuf,
    /// Output CSV file ('-' for stdout)
    #[arg(short = 'o', long = "output", default_value = "athletes_per_country.csv")]
    pub output: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Maximum rows to scan (0 = all)
    #[arg(long, default_value_t = 0)]
    pub limit: usize,
    /// Render the result as an aligned table when writing to stdout
    #[arg(long = "table")]
    pub table: bool,
}

#[derive(Debug, Args)]
pub struct MedalsArgs {
    /// Input CSV file of participation records ('-' for stdin)
    #[arg(short = 'i', long = "input", default_value = "dataset_olympics.csv")]
    pub input: PathBuf,
    /// Output CSV file ('-' for stdout)
    #[arg(short = 'o', long = "output", default_value = "medals_per_country.csv")]
    pub output: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Maximum rows to scan (0 = all)
    #[arg(long, default_value_t = 0)]
    pub limit: usize,
    /// Render the result as an aligned table when writing to stdout
    #[arg(long = "table")]
    pub table: bool,
}

#[derive(Debug, Args)]
pub struct RolesArgs {
    /// Input CSV file to probe ('-' for stdin)
    #[arg(short = 'i', long = "input", default_value = "dataset_olympics.csv")]
    pub input: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Emit the report as JSON instead of a table
    #[arg(long = "json")]
    pub json: bool,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
