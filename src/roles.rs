//! Role-resolution diagnostics: report how each logical role binds to the
//! input's header row without running a pipeline. Unlike the pipeline
//! commands, an unresolvable edition anchor is reported, not fatal.

use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;

use crate::{
    cli::RolesArgs,
    io_utils,
    schema::{ColumnRef, CountryBinding, Role},
    table,
};

#[derive(Debug, Serialize)]
pub struct RoleReport {
    pub input: String,
    /// False when neither an edition-label nor a year column resolved; a
    /// `share` run over this file would abort.
    pub resolvable: bool,
    pub roles: Vec<RoleEntry>,
}

#[derive(Debug, Serialize)]
pub struct RoleEntry {
    pub role: &'static str,
    pub column: Option<String>,
    /// Zero-based position of the bound column.
    pub index: Option<usize>,
    pub source: &'static str,
}

pub fn build_report(input: &Path, headers: &[String]) -> RoleReport {
    let mut roles = Vec::with_capacity(Role::ALL.len());
    for role in Role::ALL {
        let entry = if role == Role::Country {
            match CountryBinding::resolve(headers) {
                CountryBinding::Alias(column) => entry(role, Some(column), "alias"),
                CountryBinding::Fallback(column) => entry(role, Some(column), "fallback"),
                CountryBinding::Synthesized => entry(role, None, "synthesized"),
            }
        } else {
            match role.locate(headers) {
                Some(column) => entry(role, Some(column), "alias"),
                None => entry(role, None, "unresolved"),
            }
        };
        roles.push(entry);
    }

    let resolved = |name: &str| {
        roles
            .iter()
            .any(|entry| entry.role == name && entry.column.is_some())
    };
    RoleReport {
        input: input.display().to_string(),
        resolvable: resolved(Role::Edition.as_str()) || resolved(Role::Year.as_str()),
        roles,
    }
}

fn entry(role: Role, column: Option<ColumnRef>, source: &'static str) -> RoleEntry {
    RoleEntry {
        role: role.as_str(),
        index: column.as_ref().map(|c| c.index),
        column: column.map(|c| c.name),
        source,
    }
}

pub fn execute(args: &RolesArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    info!("Probing column roles in '{}'", args.input.display());

    let mut reader = io_utils::open_csv_reader_from_path(&args.input, delimiter, true)?;
    let headers = io_utils::reader_headers(&mut reader, encoding)?;
    let report = build_report(&args.input, &headers);

    if !report.resolvable {
        warn!("No temporal anchor: neither an edition-label nor a year column resolved");
    }

    if args.json {
        let rendered =
            serde_json::to_string_pretty(&report).context("Serializing role report")?;
        println!("{rendered}");
    } else {
        let headers = vec![
            "role".to_string(),
            "column".to_string(),
            "index".to_string(),
            "source".to_string(),
        ];
        let rows: Vec<Vec<String>> = report
            .roles
            .iter()
            .map(|entry| {
                vec![
                    entry.role.to_string(),
                    entry.column.clone().unwrap_or_else(|| "-".to_string()),
                    entry
                        .index
                        .map(|index| index.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    entry.source.to_string(),
                ]
            })
            .collect();
        table::print_table(&headers, &rows);
    }
    Ok(())
}
