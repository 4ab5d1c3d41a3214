//! Common utilities for CLI tests.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Isolated home directory with a snapshot file.
pub struct Sandbox {
    pub home: TempDir,
    pub snapshot: PathBuf,
}

impl Sandbox {
    pub fn new(snapshot_json: &str) -> Self {
        let home = tempfile::tempdir().expect("Failed to create temp dir");
        let snapshot = home.path().join("snapshot.json");
        std::fs::write(&snapshot, snapshot_json).expect("Failed to write snapshot");
        Self { home, snapshot }
    }

    pub fn config_path(&self) -> PathBuf {
        self.home.path().join(".config/habitflow/config.toml")
    }

    /// Invoke the CLI with `--snapshot` and return (stdout, stderr, code).
    pub fn run(&self, args: &[&str]) -> (String, String, i32) {
        run_cli(self.home.path(), Some(&self.snapshot), args)
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let (stdout, stderr, code) = self.run(args);
        assert_eq!(code, 0, "CLI command failed {:?}: {}", args, stderr);
        stdout
    }

    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let stdout = self.run_success(args);
        serde_json::from_str(&stdout).expect("Failed to parse JSON output")
    }
}

/// Invoke the built binary with HOME pointed at `home`.
pub fn run_cli(home: &Path, snapshot: Option<&Path>, args: &[&str]) -> (String, String, i32) {
    let mut command = Command::new(env!("CARGO_BIN_EXE_habitflow-cli"));
    command
        .env("HOME", home)
        .env_remove("HABITFLOW_ENV")
        .env_remove("RUST_LOG");
    if let Some(snapshot) = snapshot {
        command.arg("--snapshot").arg(snapshot);
    }
    let output = command
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}
