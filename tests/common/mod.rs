#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

/// Builds a participation CSV in the canonical athlete-events column layout,
/// one row per athlete appearance.
pub fn scenario_csv(counts: &[(&str, usize)], games: &str, year: &str, season: &str) -> String {
    let mut csv = String::from("ID,Name,Team,NOC,Games,Year,Season,City\n");
    let mut id = 0usize;
    for (team, count) in counts {
        for _ in 0..*count {
            id += 1;
            csv.push_str(&format!(
                "{id},Athlete {id},{team},{team},{games},{year},{season},Host City\n"
            ));
        }
    }
    csv
}
