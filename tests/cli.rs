mod common;

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use csv::{ReaderBuilder, StringRecord};
use predicates::str::contains;

use common::{TestWorkspace, scenario_csv};

fn read_csv(path: &Path) -> (StringRecord, Vec<StringRecord>) {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .expect("open csv for reading");
    let headers = reader.headers().expect("headers").clone();
    let rows = reader
        .records()
        .map(|r| r.expect("read record"))
        .collect::<Vec<_>>();
    (headers, rows)
}

#[test]
fn counts_ranks_countries_by_appearances() {
    let workspace = TestWorkspace::new();
    let input = workspace.write(
        "athletes.csv",
        &scenario_csv(
            &[("USA", 2), ("BRA", 1), ("FRA", 2)],
            "2016 Summer",
            "2016",
            "Summer",
        ),
    );
    let output = workspace.path().join("athletes_per_country.csv");

    Command::cargo_bin("olympic-attendance")
        .expect("binary exists")
        .args([
            "counts",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let (headers, rows) = read_csv(&output);
    assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["country", "athletes"]);
    let listed: Vec<(&str, &str)> = rows
        .iter()
        .map(|row| (row.get(0).unwrap(), row.get(1).unwrap()))
        .collect();
    // FRA and USA tie at two appearances; name order breaks the tie.
    assert_eq!(listed, vec![("FRA", "2"), ("USA", "2"), ("BRA", "1")]);
}

#[test]
fn counts_limit_caps_scanned_rows() {
    let workspace = TestWorkspace::new();
    let input = workspace.write(
        "athletes.csv",
        &scenario_csv(&[("USA", 5)], "2016 Summer", "2016", "Summer"),
    );
    let output = workspace.path().join("athletes_per_country.csv");

    Command::cargo_bin("olympic-attendance")
        .expect("binary exists")
        .args([
            "counts",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--limit",
            "2",
        ])
        .assert()
        .success();

    let (_, rows) = read_csv(&output);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get(1), Some("2"));
}

#[test]
fn counts_reads_stdin_and_writes_stdout() {
    let assert = Command::cargo_bin("olympic-attendance")
        .expect("binary exists")
        .args(["counts", "-i", "-", "-o", "-"])
        .write_stdin(scenario_csv(
            &[("USA", 3)],
            "2016 Summer",
            "2016",
            "Summer",
        ))
        .assert()
        .success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout");
    assert!(output.contains("\"USA\",\"3\""));
}

#[test]
fn tsv_extension_switches_delimiter() {
    let workspace = TestWorkspace::new();
    let input = workspace.write(
        "athletes.tsv",
        "ID\tTeam\tGames\tYear\n1\tUSA\t2016 Summer\t2016\n2\tUSA\t2016 Summer\t2016\n",
    );
    let output = workspace.path().join("athletes_per_country.csv");

    Command::cargo_bin("olympic-attendance")
        .expect("binary exists")
        .args([
            "counts",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let (_, rows) = read_csv(&output);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get(0), Some("USA"));
    assert_eq!(rows[0].get(1), Some("2"));
}

#[test]
fn medals_tally_gold_silver_bronze_per_country() {
    let workspace = TestWorkspace::new();
    let input = workspace.write(
        "athletes.csv",
        "ID,Name,Team,NOC,Games,Year,Season,City,Medal\n\
         1,Athlete 1,NOR,NOR,2016 Summer,2016,Summer,Rio,Gold\n\
         2,Athlete 2,NOR,NOR,2016 Summer,2016,Summer,Rio,Bronze\n\
         3,Athlete 3,SWE,SWE,2016 Summer,2016,Summer,Rio,Silver\n\
         4,Athlete 4,FIN,FIN,2016 Summer,2016,Summer,Rio,gold\n\
         5,Athlete 5,FIN,FIN,2016 Summer,2016,Summer,Rio,Silver\n\
         6,Athlete 6,ITA,ITA,2016 Summer,2016,Summer,Rio,NA\n\
         7,Athlete 7,ITA,ITA,2016 Summer,2016,Summer,Rio,\n",
    );
    let output = workspace.path().join("medals_per_country.csv");

    Command::cargo_bin("olympic-attendance")
        .expect("binary exists")
        .args([
            "medals",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let (headers, rows) = read_csv(&output);
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["country", "gold", "silver", "bronze", "total"]
    );
    let listed: Vec<Vec<&str>> = rows.iter().map(|row| row.iter().collect()).collect();
    // ITA never medals and stays off the board entirely.
    assert_eq!(
        listed,
        vec![
            vec!["FIN", "1", "1", "0", "2"],
            vec!["NOR", "1", "0", "1", "2"],
            vec!["SWE", "0", "1", "0", "1"],
        ]
    );
}

#[test]
fn medals_fails_without_medal_column() {
    let workspace = TestWorkspace::new();
    let input = workspace.write(
        "athletes.csv",
        &scenario_csv(&[("USA", 1)], "2016 Summer", "2016", "Summer"),
    );

    Command::cargo_bin("olympic-attendance")
        .expect("binary exists")
        .args(["medals", "-i", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("no medal column"));
}

#[test]
fn share_aborts_without_temporal_anchor() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("odd.csv", "Team,City\nUSA,Los Angeles\n");
    let output = workspace.path().join("shares.csv");

    Command::cargo_bin("olympic-attendance")
        .expect("binary exists")
        .args([
            "share",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(contains("mandatory role 'edition'"));
    assert!(!output.exists());
}

#[test]
fn roles_reports_bindings_as_json() {
    let workspace = TestWorkspace::new();
    let input = workspace.write(
        "athletes.csv",
        &scenario_csv(&[("USA", 1)], "2016 Summer", "2016", "Summer"),
    );

    let assert = Command::cargo_bin("olympic-attendance")
        .expect("binary exists")
        .args(["roles", "-i", input.to_str().unwrap(), "--json"])
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("json report");
    assert_eq!(report["resolvable"], true);
    let roles = report["roles"].as_array().expect("roles array");
    let country = roles
        .iter()
        .find(|entry| entry["role"] == "country")
        .expect("country entry");
    assert_eq!(country["column"], "Team");
    assert_eq!(country["source"], "alias");
    let season = roles
        .iter()
        .find(|entry| entry["role"] == "season")
        .expect("season entry");
    assert_eq!(season["index"], 6);
}

#[test]
fn roles_flags_anchorless_files_without_failing() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("odd.csv", "City,Sport\nRio,Rowing\n");

    let assert = Command::cargo_bin("olympic-attendance")
        .expect("binary exists")
        .args(["roles", "-i", input.to_str().unwrap()])
        .assert()
        .success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout");
    assert!(output.contains("synthesized"));
    assert!(output.contains("unresolved"));
}

#[test]
fn share_writes_default_output_next_to_invocation() {
    let workspace = TestWorkspace::new();
    let input = workspace.write(
        "dataset_olympics.csv",
        &scenario_csv(&[("USA", 1)], "2016 Summer", "2016", "Summer"),
    );

    Command::cargo_bin("olympic-attendance")
        .expect("binary exists")
        .current_dir(workspace.path())
        .args(["share", "-i", input.to_str().unwrap()])
        .assert()
        .success();

    let default_output = workspace.path().join("top8_countries_attendance.csv");
    let contents = fs::read_to_string(&default_output).expect("default output");
    assert!(contents.contains("\"USA\""));
}
