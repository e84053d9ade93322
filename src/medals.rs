//! Per-country medal tallies. Rows whose medal cell is not gold, silver,
//! or bronze (the source marks non-medalists `NA`) are ignored.

use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use log::{debug, info};

use crate::{
    cli::MedalsArgs,
    io_utils,
    schema::{self, CountryBinding},
    table,
};

pub const MEDAL_ALIASES: &[&str] = &["Medal"];

const OUTPUT_HEADERS: [&str; 5] = ["country", "gold", "silver", "bronze", "total"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn from_cell(cell: &str) -> Option<Medal> {
        match cell.trim().to_ascii_lowercase().as_str() {
            "gold" => Some(Medal::Gold),
            "silver" => Some(Medal::Silver),
            "bronze" => Some(Medal::Bronze),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MedalTally {
    pub gold: u64,
    pub silver: u64,
    pub bronze: u64,
}

impl MedalTally {
    fn record(&mut self, medal: Medal) {
        match medal {
            Medal::Gold => self.gold += 1,
            Medal::Silver => self.silver += 1,
            Medal::Bronze => self.bronze += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.gold + self.silver + self.bronze
    }
}

/// Streaming medal accumulator. Countries enter the board on their first
/// medal; non-medal rows only bump the ignored counter.
#[derive(Debug, Default)]
pub struct MedalBoard {
    tallies: HashMap<String, MedalTally>,
    ignored: usize,
}

impl MedalBoard {
    pub fn ingest(&mut self, country: &str, medal_cell: &str) {
        let country = country.trim();
        if country.is_empty() {
            self.ignored += 1;
            return;
        }
        match Medal::from_cell(medal_cell) {
            Some(medal) => self
                .tallies
                .entry(country.to_string())
                .or_default()
                .record(medal),
            None => self.ignored += 1,
        }
    }

    pub fn ignored(&self) -> usize {
        self.ignored
    }

    /// Rows sorted by total descending, then country ascending.
    pub fn into_rows(self) -> Vec<(String, MedalTally)> {
        let mut rows: Vec<(String, MedalTally)> = self.tallies.into_iter().collect();
        rows.sort_by(|a, b| b.1.total().cmp(&a.1.total()).then_with(|| a.0.cmp(&b.0)));
        rows
    }
}

pub fn execute(args: &MedalsArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    info!("Tallying medals per country in '{}'", args.input.display());

    let mut reader = io_utils::open_csv_reader_from_path(&args.input, delimiter, true)?;
    let headers = io_utils::reader_headers(&mut reader, encoding)?;
    let country = CountryBinding::resolve(&headers);
    let Some(medal_column) = schema::locate_any(&headers, MEDAL_ALIASES) else {
        bail!(
            "no medal column in {:?}: expected one of {:?}",
            args.input,
            MEDAL_ALIASES
        );
    };

    let mut board = MedalBoard::default();
    for (row_idx, result) in reader.byte_records().enumerate() {
        if args.limit > 0 && row_idx >= args.limit {
            break;
        }
        let record = result.with_context(|| format!("Reading row {}", row_idx + 2))?;
        let row = io_utils::decode_record(&record, encoding)?;
        let medal_cell = row
            .get(medal_column.index)
            .map(String::as_str)
            .unwrap_or("");
        board.ingest(country.value_in(&row), medal_cell);
    }
    if board.ignored() > 0 {
        debug!("Ignored {} non-medal row(s)", board.ignored());
    }

    let rows = board.into_rows();
    let rendered: Vec<Vec<String>> = rows
        .iter()
        .map(|(country, tally)| {
            vec![
                country.clone(),
                tally.gold.to_string(),
                tally.silver.to_string(),
                tally.bronze.to_string(),
                tally.total().to_string(),
            ]
        })
        .collect();

    if args.table && io_utils::is_dash(&args.output) {
        let headers = OUTPUT_HEADERS.iter().map(|h| h.to_string()).collect::<Vec<_>>();
        table::print_table(&headers, &rendered);
    } else {
        let mut writer = io_utils::open_csv_writer(Some(&args.output))?;
        writer
            .write_record(OUTPUT_HEADERS)
            .context("Writing output headers")?;
        for row in &rendered {
            writer.write_record(row).context("Writing output row")?;
        }
        writer.flush().context("Flushing output")?;
    }

    info!(
        "Wrote {} medal tally row(s) to '{}'",
        rows.len(),
        args.output.display()
    );
    Ok(())
}
