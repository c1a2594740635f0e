//! Ordered, per-invocation log of packaging and organizing actions.
//!
//! Each operation gets its own `ActionLog`; nothing is global. Every entry
//! is also emitted as a `tracing` event so it shows up in the application log.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEntry {
    pub level: ActionLevel,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ActionLog {
    entries: Vec<ActionEntry>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{}", message.trim_start());
        self.push(ActionLevel::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message.trim_start());
        self.push(ActionLevel::Warn, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!("{}", message.trim_start());
        self.push(ActionLevel::Error, message);
    }

    fn push(&mut self, level: ActionLevel, message: String) {
        self.entries.push(ActionEntry { level, message });
    }

    pub fn entries(&self) -> &[ActionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, level: ActionLevel) -> usize {
        self.entries.iter().filter(|e| e.level == level).count()
    }

    /// Plain-text report: header block, then one line per action.
    pub fn render(&self, output_archive: &Path, date: DateTime<Local>) -> String {
        let mut out = String::new();
        out.push_str("--- Process Log ---\n");
        out.push_str(&format!("Output archive: {}\n", output_archive.display()));
        out.push_str(&format!("Date: {}\n", date.format("%Y-%m-%d %H:%M:%S")));
        out.push_str("------------------------\n\n");
        let lines: Vec<&str> = self.entries.iter().map(|e| e.message.as_str()).collect();
        out.push_str(&lines.join("\n"));
        out.push('\n');
        out
    }

    /// Write the report to `path`, creating its parent directory.
    pub fn write_report(&self, path: &Path, output_archive: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.render(output_archive, Local::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn entries_keep_order_and_level() {
        let mut log = ActionLog::new();
        log.info("first");
        log.warn("second");
        log.error("third");
        let messages: Vec<&str> = log.entries().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
        assert_eq!(log.count(ActionLevel::Warn), 1);
        assert_eq!(log.count(ActionLevel::Error), 1);
    }

    #[test]
    fn render_has_header_then_lines() {
        let mut log = ActionLog::new();
        log.info("Processing a.pdf");
        log.info("  -> [ADDED] a.pdf");
        let date = Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        let text = log.render(Path::new("/out/consolidado.zip"), date);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "--- Process Log ---");
        assert_eq!(lines[1], "Output archive: /out/consolidado.zip");
        assert_eq!(lines[2], "Date: 2024-03-05 14:07:09");
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "Processing a.pdf");
        assert_eq!(lines[6], "  -> [ADDED] a.pdf");
    }

    #[test]
    fn write_report_creates_parent() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("logs").join("process.txt");
        let mut log = ActionLog::new();
        log.info("done");
        log.write_report(&path, Path::new("out.zip")).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("--- Process Log ---"));
        assert!(text.contains("done"));
    }
}
