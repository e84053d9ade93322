//! Logical-role resolution against a file's header row.
//!
//! Olympic participation exports disagree on column naming: the edition
//! label may arrive as `Games`, `Edition`, or `Games_Name`; the country as
//! `Team`, `NOC`, or `Nation`. This module owns the alias tables for the
//! four logical roles (edition, country, year, season) and resolves them
//! once per run into a [`RoleMap`], the typed object every later stage
//! consumes. No header string-matching happens outside this module.
//!
//! Resolution rules:
//! - alias lists are tried in order, case-insensitive exact match;
//! - the country role falls back to a national-code column and finally to a
//!   synthesized constant, so it always resolves;
//! - the edition role resolves to a label column, or is derived from the
//!   year column; when neither exists the run aborts (no temporal anchor).

use std::fmt;

use log::debug;
use thiserror::Error;

/// Placeholder country used when no country-bearing column exists at all.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

const EDITION_ALIASES: &[&str] = &["Games", "Edition", "Games_Name", "Games Name"];
const COUNTRY_ALIASES: &[&str] = &["Country", "Team", "NOC", "Country_Name", "Nation"];
const YEAR_ALIASES: &[&str] = &["Year", "Edition_Year", "Games_Year", "Season_Year", "Games Year"];
const SEASON_ALIASES: &[&str] = &["Season", "Games_Season"];

/// National-code columns accepted for the country role when none of its
/// aliases match.
const COUNTRY_FALLBACKS: &[&str] = &["Code", "Country_Code"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Edition,
    Country,
    Year,
    Season,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Edition, Role::Country, Role::Year, Role::Season];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Edition => "edition",
            Role::Country => "country",
            Role::Year => "year",
            Role::Season => "season",
        }
    }

    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Role::Edition => EDITION_ALIASES,
            Role::Country => COUNTRY_ALIASES,
            Role::Year => YEAR_ALIASES,
            Role::Season => SEASON_ALIASES,
        }
    }

    /// First alias with a case-insensitive exact header match, if any.
    pub fn locate(self, headers: &[String]) -> Option<ColumnRef> {
        locate_any(headers, self.aliases())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First header matching any candidate, case-insensitively. Candidate order
/// wins over header order.
pub fn locate_any(headers: &[String], candidates: &[&str]) -> Option<ColumnRef> {
    for candidate in candidates {
        if let Some(index) = headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(candidate))
        {
            return Some(ColumnRef {
                index,
                name: headers[index].clone(),
            });
        }
    }
    None
}

/// A resolved header: position plus the concrete name found in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub index: usize,
    pub name: String,
}

/// How the country role was satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountryBinding {
    /// One of the country aliases matched.
    Alias(ColumnRef),
    /// A national-code column stood in for the missing country column.
    Fallback(ColumnRef),
    /// No usable column; every record maps to [`UNKNOWN_COUNTRY`].
    Synthesized,
}

impl CountryBinding {
    /// Alias match first, then the national-code fallbacks, then the
    /// synthesized constant. Never fails.
    pub fn resolve(headers: &[String]) -> Self {
        match Role::Country.locate(headers) {
            Some(column) => CountryBinding::Alias(column),
            None => match locate_any(headers, COUNTRY_FALLBACKS) {
                Some(column) => CountryBinding::Fallback(column),
                None => CountryBinding::Synthesized,
            },
        }
    }

    pub fn column(&self) -> Option<&ColumnRef> {
        match self {
            CountryBinding::Alias(column) | CountryBinding::Fallback(column) => Some(column),
            CountryBinding::Synthesized => None,
        }
    }

    pub fn value_in<'a>(&self, row: &'a [String]) -> &'a str {
        match self.column() {
            Some(column) => row.get(column.index).map(String::as_str).unwrap_or(""),
            None => UNKNOWN_COUNTRY,
        }
    }
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error(
        "mandatory role 'edition' cannot be resolved: no column matches {edition_aliases:?} \
         and no year column matches {year_aliases:?}"
    )]
    MissingEdition {
        edition_aliases: &'static [&'static str],
        year_aliases: &'static [&'static str],
    },
}

/// Role-to-column mapping resolved once per run and consumed read-only by
/// every pipeline stage.
#[derive(Debug, Clone)]
pub struct RoleMap {
    /// Edition-label column; `None` means the label is derived from `year`.
    pub edition: Option<ColumnRef>,
    pub country: CountryBinding,
    pub year: Option<ColumnRef>,
    pub season: Option<ColumnRef>,
}

impl RoleMap {
    pub fn resolve(headers: &[String]) -> Result<Self, SchemaError> {
        let edition = Role::Edition.locate(headers);
        let year = Role::Year.locate(headers);
        if edition.is_none() && year.is_none() {
            return Err(SchemaError::MissingEdition {
                edition_aliases: EDITION_ALIASES,
                year_aliases: YEAR_ALIASES,
            });
        }

        let country = CountryBinding::resolve(headers);
        let season = Role::Season.locate(headers);

        debug!(
            "Resolved roles: edition={:?} country={:?} year={:?} season={:?}",
            edition.as_ref().map(|c| c.name.as_str()),
            country.column().map(|c| c.name.as_str()),
            year.as_ref().map(|c| c.name.as_str()),
            season.as_ref().map(|c| c.name.as_str()),
        );

        Ok(RoleMap {
            edition,
            country,
            year,
            season,
        })
    }

    /// True when the file carries a real edition-label column; drives the
    /// wider `country,Games,Year` output layout.
    pub fn has_edition_label(&self) -> bool {
        self.edition.is_some()
    }

    pub fn country_of<'a>(&self, row: &'a [String]) -> &'a str {
        self.country.value_in(row)
    }

    pub fn edition_field<'a>(&self, row: &'a [String]) -> Option<&'a str> {
        self.edition
            .as_ref()
            .and_then(|column| row.get(column.index))
            .map(String::as_str)
    }

    pub fn year_field<'a>(&self, row: &'a [String]) -> Option<&'a str> {
        self.year
            .as_ref()
            .and_then(|column| row.get(column.index))
            .map(String::as_str)
    }

    pub fn season_field<'a>(&self, row: &'a [String]) -> Option<&'a str> {
        self.season
            .as_ref()
            .and_then(|column| row.get(column.index))
            .map(String::as_str)
    }
}
