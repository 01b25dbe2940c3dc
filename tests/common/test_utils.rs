#![allow(dead_code)]
use std::fs;
use std::io::Result as IoResult;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// A scratch directory holding an event stream and the report written from it.
pub struct TestBuild {
    /// Removed together with its contents when dropped.
    pub temp_dir: TempDir,
    lines: Vec<String>,
}

impl TestBuild {
    pub fn new() -> IoResult<Self> {
        Ok(TestBuild {
            temp_dir: tempdir()?,
            lines: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative` inside the scratch directory, as a string.
    pub fn abs(&self, relative: &str) -> String {
        self.path().join(relative).to_string_lossy().into_owned()
    }

    pub fn start(&mut self, project: &str) -> &mut Self {
        self.lines.push(
            serde_json::json!({"event": "project_started", "project": project}).to_string(),
        );
        self
    }

    pub fn finish(&mut self) -> &mut Self {
        self.lines
            .push(serde_json::json!({"event": "project_finished"}).to_string());
        self
    }

    pub fn error(&mut self, code: &str, text: &str, file: &str, line: u32, column: u32) -> &mut Self {
        self.lines.push(
            serde_json::json!({
                "event": "error", "code": code, "text": text,
                "file": file, "line": line, "column": column
            })
            .to_string(),
        );
        self
    }

    pub fn warning(&mut self, code: &str, text: &str, file: &str, line: u32, column: u32) -> &mut Self {
        self.lines.push(
            serde_json::json!({
                "event": "warning", "code": code, "text": text,
                "file": file, "line": line, "column": column
            })
            .to_string(),
        );
        self
    }

    pub fn message(&mut self, text: &str, importance: &str) -> &mut Self {
        self.lines.push(
            serde_json::json!({"event": "message", "text": text, "importance": importance})
                .to_string(),
        );
        self
    }

    /// Writes the collected events as JSON lines and returns the file path.
    pub fn write_events(&self) -> IoResult<PathBuf> {
        let path = self.path().join("events.jsonl");
        let mut content = self.lines.join("\n");
        content.push('\n');
        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn report_path(&self) -> PathBuf {
        self.path().join("msbuild.xml")
    }

    pub fn read_report(&self) -> IoResult<String> {
        fs::read_to_string(self.report_path())
    }
}
