//! Shared fixtures for conductor integration tests

#![allow(dead_code)]

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Minimal orchestrator.yaml that passes validation
pub const VALID_YAML: &str = r#"
project:
  name: test-project
  repository: https://github.com/test/repo.git

credentials:
  backend: env

docker:
  base_image: debian:bookworm-slim

agents:
  worker:
    prompt:
      system: system.md
      task: "do the thing"
    workspace: rw

pipeline:
  - { name: build, agent: worker }
"#;

/// Path to a checked-in fixture under `tests/fixtures`
pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Write `content` to `orchestrator.yaml` inside a fresh temp dir.
///
/// Keep the returned `TempDir` alive for as long as the path is used.
pub fn write_config(content: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("orchestrator.yaml");
    std::fs::write(&path, content).expect("write config");
    (dir, path)
}

/// In-memory log sink shared between the dispatcher and the test
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).expect("utf-8 logs")
    }
}

/// Captured result of one CLI invocation
#[derive(Debug)]
pub struct CliOutcome {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
    /// Everything the scoped logger wrote (text or JSON lines, depending on
    /// whether the test process's stderr is a terminal)
    pub logs: String,
}

/// Run the CLI in-process with the given arguments (program name is added)
pub fn run_cli(args: &[&str]) -> CliOutcome {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let capture = LogCapture::default();
    let log_writer = {
        let capture = capture.clone();
        move || capture.clone()
    };
    let argv = std::iter::once("conductor").chain(args.iter().copied());
    let code = conductor::cli::run(argv, &mut stdout, &mut stderr, log_writer);

    CliOutcome {
        code,
        stdout: String::from_utf8(stdout).expect("utf-8 stdout"),
        stderr: String::from_utf8(stderr).expect("utf-8 stderr"),
        logs: capture.contents(),
    }
}
