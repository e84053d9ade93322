use std::sync::OnceLock;

use regex::Regex;

/// Bounds accepted by the token-scan fallback.
pub const YEAR_FLOOR: i32 = 1800;
pub const YEAR_CEILING: i32 = 2100;

static LABEL_PREFIX_YEAR: OnceLock<Regex> = OnceLock::new();

fn label_prefix_pattern() -> &'static Regex {
    LABEL_PREFIX_YEAR
        .get_or_init(|| Regex::new(r"^\s*((?:18|19|20|21)\d{2})\b").expect("year pattern compiles"))
}

/// Derives the edition year for one record, trying in order: numeric
/// coercion of the year cell, a 4-digit prefix on the edition label, then a
/// token scan over the label. Every failure is local; `None` means the
/// record carries no recoverable year and is dropped downstream.
pub fn derive_year(year_cell: Option<&str>, label: &str) -> Option<i32> {
    if let Some(cell) = year_cell
        && let Some(year) = coerce_numeric_year(cell)
    {
        return Some(year);
    }
    year_from_label_prefix(label).or_else(|| year_from_label_tokens(label))
}

/// Accepts integer text and float text with a zero fraction ("2016",
/// "2016.0"); spreadsheet exports render integral years the second way when
/// the column contains blanks.
pub fn coerce_numeric_year(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(year) = trimmed.parse::<i32>() {
        return Some(year);
    }
    match trimmed.parse::<f64>() {
        Ok(value)
            if value.is_finite()
                && value.fract() == 0.0
                && (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&value) =>
        {
            Some(value as i32)
        }
        _ => None,
    }
}

/// Matches labels that open with the year, like "2016 Summer Olympics".
/// Anchored at the label start; "Rio 2016 Games" falls to the token scan.
pub fn year_from_label_prefix(label: &str) -> Option<i32> {
    label_prefix_pattern()
        .captures(label)
        .and_then(|captures| captures.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Scans whitespace tokens for the first one that, stripped of surrounding
/// punctuation, is exactly four digits inside [`YEAR_FLOOR`, `YEAR_CEILING`].
pub fn year_from_label_tokens(label: &str) -> Option<i32> {
    label.split_whitespace().find_map(|token| {
        let digits = token.trim_matches(|c: char| c.is_ascii_punctuation());
        if digits.len() == 4 && digits.bytes().all(|b| b.is_ascii_digit()) {
            let year: i32 = digits.parse().ok()?;
            (YEAR_FLOOR..=YEAR_CEILING).contains(&year).then_some(year)
        } else {
            None
        }
    })
}
