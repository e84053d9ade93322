//! Per-country participation counts. Every record with a country counts as
//! one appearance; there is no edition filtering and no bucketing.

use std::collections::HashMap;

use anyhow::{Context, Result};
use log::{debug, info};

use crate::{cli::CountsArgs, io_utils, schema::CountryBinding, table};

const OUTPUT_HEADERS: [&str; 2] = ["country", "athletes"];

/// Streaming appearance counter.
#[derive(Debug, Default)]
pub struct CountryCounter {
    counts: HashMap<String, u64>,
    skipped: usize,
}

impl CountryCounter {
    pub fn ingest(&mut self, country: &str) {
        let country = country.trim();
        if country.is_empty() {
            self.skipped += 1;
            return;
        }
        *self.counts.entry(country.to_string()).or_insert(0) += 1;
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Rows sorted by count descending, then country ascending.
    pub fn into_rows(self) -> Vec<(String, u64)> {
        let mut rows: Vec<(String, u64)> = self.counts.into_iter().collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        rows
    }
}

pub fn execute(args: &CountsArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    info!("Counting athletes per country in '{}'", args.input.display());

    let mut reader = io_utils::open_csv_reader_from_path(&args.input, delimiter, true)?;
    let headers = io_utils::reader_headers(&mut reader, encoding)?;
    let country = CountryBinding::resolve(&headers);

    let mut counter = CountryCounter::default();
    for (row_idx, result) in reader.byte_records().enumerate() {
        if args.limit > 0 && row_idx >= args.limit {
            break;
        }
        let record = result.with_context(|| format!("Reading row {}", row_idx + 2))?;
        let row = io_utils::decode_record(&record, encoding)?;
        counter.ingest(country.value_in(&row));
    }
    if counter.skipped() > 0 {
        debug!("Skipped {} row(s) without a country", counter.skipped());
    }

    let rows = counter.into_rows();
    let rendered: Vec<Vec<String>> = rows
        .iter()
        .map(|(country, athletes)| vec![country.clone(), athletes.to_string()])
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
        "Wrote {} country count(s) to '{}'",
        rows.len(),
        args.output.display()
    );
    Ok(())
}
