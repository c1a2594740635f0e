//! Nesting addresses: a physical path plus the chain of in-archive entry names.
//!
//! Internally an address is structured. The `path:entry:entry` string form is
//! only produced at the boundary (JSON, logs, reports) and parsed back with
//! [`resolve`].
//!
//! # Parsing rules
//! - Backslashes are normalized to `/` before splitting.
//! - A leading drive prefix (`C:/...`) keeps its colon in the physical path.
//! - Every other `:` is a nesting boundary.
//! - Input with an empty physical part or an empty segment is treated as a
//!   plain path with zero segments.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

/// Location of a document: physical file plus zero or more ZIP entry names,
/// innermost last.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentAddress {
    physical: PathBuf,
    segments: Vec<String>,
}

impl DocumentAddress {
    /// Address of a file sitting directly on disk.
    pub fn on_disk(path: impl Into<PathBuf>) -> Self {
        Self {
            physical: path.into(),
            segments: Vec::new(),
        }
    }

    pub fn new(physical: impl Into<PathBuf>, segments: Vec<String>) -> Self {
        Self {
            physical: physical.into(),
            segments,
        }
    }

    /// Parse the composite string form.
    pub fn parse(address: &str) -> Self {
        let (physical, segments) = resolve(address);
        Self { physical, segments }
    }

    /// Address of `entry_name` inside the archive this address points at.
    pub fn join(&self, entry_name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(entry_name.to_string());
        Self {
            physical: self.physical.clone(),
            segments,
        }
    }

    pub fn physical(&self) -> &Path {
        &self.physical
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of enclosing archives.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_nested(&self) -> bool {
        !self.segments.is_empty()
    }

    pub fn into_parts(self) -> (PathBuf, Vec<String>) {
        (self.physical, self.segments)
    }
}

impl fmt::Display for DocumentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.physical.display())?;
        for segment in &self.segments {
            write!(f, ":{}", segment)?;
        }
        Ok(())
    }
}

impl Serialize for DocumentAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DocumentAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(DocumentAddress::parse(&raw))
    }
}

/// Split a composite address into its physical path and ordered segments.
///
/// Pure; never fails. See the module docs for the rules.
pub fn resolve(address: &str) -> (PathBuf, Vec<String>) {
    let normalized = address.replace('\\', "/");
    let search_from = if has_drive_prefix(&normalized) { 2 } else { 0 };

    let Some(offset) = normalized[search_from..].find(':') else {
        return (to_native(&normalized), Vec::new());
    };
    let boundary = search_from + offset;
    let physical = &normalized[..boundary];
    let segments: Vec<String> = normalized[boundary + 1..]
        .split(':')
        .map(str::to_string)
        .collect();

    if physical.is_empty() || segments.iter().any(|s| s.is_empty()) {
        return (to_native(&normalized), Vec::new());
    }

    (to_native(physical), segments)
}

/// `X:/` where X is a single ASCII letter.
fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/'
}

fn to_native(path: &str) -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(path.replace('/', "\\"))
    } else {
        PathBuf::from(path)
    }
}
