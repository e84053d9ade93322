//! Edition filtering: the closed set of Summer-Games years plus the two
//! defensive season checks layered on top of it.

use heck::ToTitleCase;

/// Summer editions 1896–2024. The 1916, 1940, and 1944 Games were cancelled
/// and never appear in participation exports.
pub const SUMMER_GAMES_YEARS: &[i32] = &[
    1896, 1900, 1904, 1908, 1912, 1920, 1924, 1928, 1932, 1936, 1948, 1952, 1956, 1960, 1964,
    1968, 1972, 1976, 1980, 1984, 1988, 1992, 1996, 2000, 2004, 2008, 2012, 2016, 2020, 2024,
];

pub fn is_summer_year(year: i32) -> bool {
    SUMMER_GAMES_YEARS.binary_search(&year).is_ok()
}

/// Season cells arrive as "Summer", "summer", " SUMMER " and similar;
/// trim and title-case before comparing.
pub fn season_is_summer(raw: &str) -> bool {
    raw.trim().to_title_case() == "Summer"
}

pub fn label_mentions_winter(label: &str) -> bool {
    label.to_ascii_lowercase().contains("winter")
}

/// All applicable checks must pass: the year belongs to the Summer set, the
/// season cell (when that column resolved) reads Summer, and the edition
/// label does not mention Winter. The label check still rejects a Winter
/// row mis-tagged with a Summer year.
pub fn passes_edition_filters(year: i32, season: Option<&str>, label: &str) -> bool {
    is_summer_year(year) && season.is_none_or(season_is_summer) && !label_mentions_winter(label)
}
