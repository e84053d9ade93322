use std::{cmp::Reverse, collections::HashMap};

use anyhow::{Context, Result};
use itertools::Itertools;
use log::{debug, info};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{cli::ShareArgs, filter, io_utils, schema::RoleMap, table, year};

/// Countries kept per edition; everything ranked below is collapsed.
pub const TOP_COUNTRIES: usize = 8;
/// Country name carried by the overflow row.
pub const OTHER_BUCKET: &str = "Other";

/// One record that survived role resolution, year derivation, and the
/// edition filters. `games` is the trimmed edition label, or the year
/// rendered as text when the file has no label column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub country: String,
    pub games: String,
    pub year: i32,
}

/// Participation count for one (edition, country) group. `first_seen` is
/// the ordinal of the group's first input appearance and breaks ranking
/// ties, so re-runs over identical input are byte-identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditionCount {
    pub games: String,
    pub year: i32,
    pub country: String,
    pub count: u64,
    first_seen: usize,
}

/// A post-bucketing row: a top-ranked country or the per-edition overflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketedCount {
    pub games: String,
    pub year: i32,
    pub country: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRow {
    pub country: String,
    pub games: String,
    pub year: i32,
    pub percent: Decimal,
}

/// Counts records per (edition label, year, country). Output order is the
/// order in which groups first appeared in the input.
pub fn aggregate(records: impl IntoIterator<Item = NormalizedRecord>) -> Vec<EditionCount> {
    let mut groups: HashMap<(String, i32, String), (u64, usize)> = HashMap::new();
    let mut next_ordinal = 0usize;
    for record in records {
        let key = (record.games, record.year, record.country);
        let slot = groups.entry(key).or_insert_with(|| {
            let ordinal = next_ordinal;
            next_ordinal += 1;
            (0, ordinal)
        });
        slot.0 += 1;
    }
    groups
        .into_iter()
        .map(|((games, year, country), (count, first_seen))| EditionCount {
            games,
            year,
            country,
            count,
            first_seen,
        })
        .sorted_by_key(|group| group.first_seen)
        .collect()
}

/// Ranks countries inside each edition by descending count (ties keep
/// first-seen order) and collapses ranks beyond `keep` into one overflow
/// row. Editions with `keep` or fewer countries pass through untouched.
pub fn bucket_top_countries(counts: Vec<EditionCount>, keep: usize) -> Vec<BucketedCount> {
    let editions = counts
        .into_iter()
        .map(|group| ((group.year, group.games.clone()), group))
        .into_group_map()
        .into_iter()
        .sorted_by(|a, b| a.0.cmp(&b.0));

    let mut rows = Vec::new();
    for ((year, games), mut edition_counts) in editions {
        // Stable sort: groups arrive in first-seen order, so equal counts
        // keep their input positions and ranks stay reproducible.
        edition_counts.sort_by_key(|group| Reverse(group.count));
        let excluded = if edition_counts.len() > keep {
            edition_counts.split_off(keep)
        } else {
            Vec::new()
        };
        for group in edition_counts {
            rows.push(BucketedCount {
                games: group.games,
                year: group.year,
                country: group.country,
                count: group.count,
            });
        }
        if !excluded.is_empty() {
            let overflow = excluded.iter().map(|group| group.count).sum();
            rows.push(BucketedCount {
                games,
                year,
                country: OTHER_BUCKET.to_string(),
                count: overflow,
            });
        }
    }
    rows
}

/// Derives each row's share of its edition. Totals are summed from the
/// bucketed rows, never reused from before bucketing: the overflow row must
/// weigh in once, not once per merged country.
pub fn attach_percentages(rows: Vec<BucketedCount>) -> Vec<ShareRow> {
    let mut totals: HashMap<(i32, String), u64> = HashMap::new();
    for row in &rows {
        *totals.entry((row.year, row.games.clone())).or_insert(0) += row.count;
    }
    rows.into_iter()
        .map(|row| {
            let total = totals[&(row.year, row.games.clone())];
            ShareRow {
                percent: percentage_of(row.count, total),
                country: row.country,
                games: row.games,
                year: row.year,
            }
        })
        .collect()
}

/// 100 × count / total in exact decimal arithmetic, rounded to two places
/// half-up (midpoint away from zero).
pub fn percentage_of(count: u64, total: u64) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(count) * Decimal::ONE_HUNDRED / Decimal::from(total))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Final output order: year ascending, edition label ascending, percentage
/// descending. The overflow row gets no special treatment; it lands
/// wherever its summed share places it.
pub fn sort_rows_for_output(rows: &mut [ShareRow]) {
    rows.sort_by(|a, b| {
        a.year
            .cmp(&b.year)
            .then_with(|| a.games.cmp(&b.games))
            .then_with(|| b.percent.cmp(&a.percent))
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputLayout {
    /// `country,Games,Year,Percentage_Attendance`
    WithGamesColumn,
    /// `Team,Year,Percentage_Attendance`, for files whose edition label is
    /// derived from the year column.
    TeamYearOnly,
}

impl OutputLayout {
    fn headers(self) -> &'static [&'static str] {
        match self {
            OutputLayout::WithGamesColumn => {
                &["country", "Games", "Year", "Percentage_Attendance"]
            }
            OutputLayout::TeamYearOnly => &["Team", "Year", "Percentage_Attendance"],
        }
    }

    fn render(self, row: &ShareRow) -> Vec<String> {
        match self {
            OutputLayout::WithGamesColumn => vec![
                row.country.clone(),
                row.games.clone(),
                row.year.to_string(),
                format_percent(row.percent),
            ],
            OutputLayout::TeamYearOnly => vec![
                row.country.clone(),
                row.year.to_string(),
                format_percent(row.percent),
            ],
        }
    }
}

fn format_percent(value: Decimal) -> String {
    format!("{value:.2}")
}

pub fn execute(args: &ShareArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let writing_to_stdout = io_utils::is_dash(&args.output);
    info!(
        "Computing top-{TOP_COUNTRIES} attendance shares for '{}'",
        args.input.display()
    );

    let mut reader = io_utils::open_csv_reader_from_path(&args.input, delimiter, true)?;
    let headers = io_utils::reader_headers(&mut reader, encoding)?;
    let roles = RoleMap::resolve(&headers)
        .with_context(|| format!("Resolving column roles for {:?}", args.input))?;

    let mut records = Vec::new();
    let mut scanned = 0usize;
    let mut missing_country = 0usize;
    let mut missing_year = 0usize;
    let mut off_season = 0usize;
    for (row_idx, result) in reader.byte_records().enumerate() {
        if args.limit > 0 && row_idx >= args.limit {
            break;
        }
        let record = result.with_context(|| format!("Reading row {}", row_idx + 2))?;
        let row = io_utils::decode_record(&record, encoding)?;
        scanned += 1;

        let country = roles.country_of(&row).trim();
        if country.is_empty() {
            missing_country += 1;
            continue;
        }
        let label = roles.edition_field(&row).unwrap_or("");
        let Some(year) = year::derive_year(roles.year_field(&row), label) else {
            missing_year += 1;
            continue;
        };
        if !filter::passes_edition_filters(year, roles.season_field(&row), label) {
            off_season += 1;
            continue;
        }

        let games = if roles.has_edition_label() {
            label.trim().to_string()
        } else {
            year.to_string()
        };
        records.push(NormalizedRecord {
            country: country.to_string(),
            games,
            year,
        });
    }
    debug!(
        "Scanned {scanned} row(s): kept {}, dropped {missing_country} without a country, \
         {missing_year} without a year, {off_season} outside the Summer editions",
        records.len()
    );

    let counts = aggregate(records);
    let buckets = bucket_top_countries(counts, TOP_COUNTRIES);
    let mut rows = attach_percentages(buckets);
    sort_rows_for_output(&mut rows);

    let editions = rows
        .iter()
        .map(|row| (row.year, row.games.as_str()))
        .unique()
        .count();
    if rows.is_empty() {
        info!("No records survived the edition filters; emitting an empty table");
    }

    let layout = if roles.has_edition_label() {
        OutputLayout::WithGamesColumn
    } else {
        OutputLayout::TeamYearOnly
    };
    let rendered: Vec<Vec<String>> = rows.iter().map(|row| layout.render(row)).collect();

    if args.table && writing_to_stdout {
        let headers = layout
            .headers()
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<_>>();
        table::print_table(&headers, &rendered);
    } else {
        if args.table {
            debug!("--table requested but output goes to a file; writing CSV");
        }
        let mut writer = io_utils::open_csv_writer(Some(&args.output))?;
        writer
            .write_record(layout.headers())
            .context("Writing output headers")?;
        for row in &rendered {
            writer.write_record(row).context("Writing output row")?;
        }
        writer.flush().context("Flushing output")?;
    }

    info!(
        "Wrote {} share row(s) across {editions} edition(s) to '{}'",
        rows.len(),
        args.output.display()
    );
    Ok(())
}
