//! Archive-aware discovery walker
//!
//! Walks a directory tree with `walkdir` and, for every regular file,
//! classifies its bare name. Files ending in `.zip` that did not classify as a
//! document are opened and their entries are walked the same way, to any
//! depth. Nested archives are held in memory.
//!
//! # Design
//!
//! - Descent into archives uses an explicit stack of open archive frames, so
//!   pathological nesting cannot exhaust the call stack.
//! - Corrupt or unreadable nodes become [`ScanWarning`]s; the sibling
//!   traversal carries on.
//! - Which occurrence of a repeated filename is `UNIQUE` depends on
//!   traversal order. Directory listing order is whatever the platform
//!   returns and is deliberately not sorted.

use crate::address::DocumentAddress;
use crate::archive::{self, bare_name, is_zip_name, DynArchive};
use crate::classifier::Classifier;
use crate::dedup::SeenNames;
use crate::error::Result;
use crate::scan_path::validate_root;
use crate::types::{DocumentKind, DocumentRecord, DocumentStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Configuration for discovery runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Whether to follow symlinks while walking directories
    #[serde(default)]
    pub follow_symlinks: bool,
    /// Maximum number of enclosing archives a record may have (None = unbounded)
    #[serde(default)]
    pub max_nesting_depth: Option<usize>,
}

/// Why a node was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    ArchiveCorrupt,
    EntryUnreadable,
    WalkError,
    DepthLimit,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WarningKind::ArchiveCorrupt => "archive_corrupt",
            WarningKind::EntryUnreadable => "entry_unreadable",
            WarningKind::WalkError => "walk_error",
            WarningKind::DepthLimit => "depth_limit",
        };
        f.write_str(s)
    }
}

/// A contained, non-fatal problem met during discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanWarning {
    pub address: String,
    pub kind: WarningKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub files_visited: u64,
    pub archives_opened: u64,
    pub entries_visited: u64,
    pub records: u64,
    pub unique: u64,
    pub duplicates: u64,
    pub duration_ms: u64,
}

/// Result of one discovery run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Discovery {
    /// Records in traversal order.
    pub records: Vec<DocumentRecord>,
    pub warnings: Vec<ScanWarning>,
    pub stats: ScanStats,
}

impl Discovery {
    pub fn unique_records(&self) -> impl Iterator<Item = &DocumentRecord> {
        self.records.iter().filter(|r| r.is_unique())
    }

    pub fn into_unique(self) -> Vec<DocumentRecord> {
        self.records.into_iter().filter(|r| r.is_unique()).collect()
    }

    pub fn counts_by_kind(&self) -> BTreeMap<DocumentKind, usize> {
        count_by_kind(&self.records)
    }
}

/// Per-classification counts, ordered by registry order.
pub fn count_by_kind<'a>(
    records: impl IntoIterator<Item = &'a DocumentRecord>,
) -> BTreeMap<DocumentKind, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.kind()).or_insert(0) += 1;
    }
    counts
}

/// Discovery walker.
#[derive(Clone, Default)]
pub struct Scanner {
    config: ScanConfig,
    classifier: Classifier,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            classifier: Classifier::new(),
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Walk `root` and every archive beneath it.
    ///
    /// Fails only when `root` is not an existing directory. An empty
    /// directory yields an empty discovery.
    pub fn discover(&self, root: &Path) -> Result<Discovery> {
        validate_root(root)?;
        let start = Instant::now();
        info!(root = %root.display(), "Starting discovery");

        let mut run = Run::new(self);
        let walker = WalkDir::new(root).follow_links(self.config.follow_symlinks);
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let at = err
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| root.display().to_string());
                    run.warn(at, WarningKind::WalkError, err.to_string());
                    continue;
                }
            };
            // Unfollowed symlinks still count when they point at a file.
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }
            run.visit_disk_file(entry.path());
        }

        let mut discovery = run.finish();
        discovery.stats.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            records = discovery.stats.records,
            unique = discovery.stats.unique,
            duplicates = discovery.stats.duplicates,
            warnings = discovery.warnings.len(),
            duration_ms = discovery.stats.duration_ms,
            "Discovery complete"
        );
        Ok(discovery)
    }
}

/// Discover with default settings.
pub fn discover(root: &Path) -> Result<Discovery> {
    Scanner::default().discover(root)
}

/// An archive currently being walked.
struct Frame {
    archive: DynArchive,
    address: DocumentAddress,
    next: usize,
}

/// Mutable state of one discovery run. Owns its dedup set.
struct Run<'a> {
    scanner: &'a Scanner,
    seen: SeenNames,
    discovery: Discovery,
}

impl<'a> Run<'a> {
    fn new(scanner: &'a Scanner) -> Self {
        Self {
            scanner,
            seen: SeenNames::new(),
            discovery: Discovery::default(),
        }
    }

    fn finish(self) -> Discovery {
        self.discovery
    }

    fn warn(&mut self, address: String, kind: WarningKind, message: String) {
        warn!(address = %address, kind = %kind, "{}", message);
        self.discovery.warnings.push(ScanWarning {
            address,
            kind,
            message,
        });
    }

    /// Classify and record; returns whether the name matched.
    fn record(&mut self, address: &DocumentAddress, filename: &str) -> bool {
        let Some(fields) = self.scanner.classifier.classify(filename) else {
            return false;
        };
        let status = self.seen.observe(filename);
        let stats = &mut self.discovery.stats;
        stats.records += 1;
        match status {
            DocumentStatus::Unique => stats.unique += 1,
            DocumentStatus::Duplicate => stats.duplicates += 1,
        }
        debug!(address = %address, kind = %fields.kind(), status = %status, "Classified");
        self.discovery.records.push(DocumentRecord {
            filename: filename.to_string(),
            address: address.clone(),
            fields,
            status,
        });
        true
    }

    /// Entries of an archive at `archive_address` would sit one level deeper.
    fn within_depth(&mut self, archive_address: &DocumentAddress) -> bool {
        match self.scanner.config.max_nesting_depth {
            Some(max) if archive_address.depth() + 1 > max => {
                self.warn(
                    archive_address.to_string(),
                    WarningKind::DepthLimit,
                    format!("Nesting depth limit {} reached; archive not opened", max),
                );
                false
            }
            _ => true,
        }
    }

    fn visit_disk_file(&mut self, path: &Path) {
        self.discovery.stats.files_visited += 1;
        let filename = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => return,
        };
        let address = DocumentAddress::on_disk(path);
        if self.record(&address, &filename) || !is_zip_name(&filename) {
            return;
        }
        if !self.within_depth(&address) {
            return;
        }
        match archive::open_file(path) {
            Ok(archive) => {
                self.discovery.stats.archives_opened += 1;
                self.walk_archive(archive, address);
            }
            Err(err) => self.warn(
                address.to_string(),
                WarningKind::ArchiveCorrupt,
                format!("Invalid ZIP archive: {}", err),
            ),
        }
    }

    fn walk_archive(&mut self, archive: DynArchive, address: DocumentAddress) {
        let mut stack = vec![Frame {
            archive,
            address,
            next: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            if frame.next >= frame.archive.len() {
                stack.pop();
                continue;
            }
            let index = frame.next;
            frame.next += 1;

            let entry_name = match frame.archive.by_index(index) {
                Ok(entry) if entry.is_dir() => continue,
                Ok(entry) => entry.name().to_string(),
                Err(err) => {
                    let at = format!("{}#{}", frame.address, index);
                    self.warn(at, WarningKind::EntryUnreadable, err.to_string());
                    continue;
                }
            };
            self.discovery.stats.entries_visited += 1;

            let entry_address = frame.address.join(&entry_name);
            let filename = bare_name(&entry_name).to_string();
            if self.record(&entry_address, &filename) || !is_zip_name(&filename) {
                continue;
            }
            if !self.within_depth(&entry_address) {
                continue;
            }

            let bytes = match archive::read_entry(&mut frame.archive, index) {
                Ok(bytes) => bytes,
                Err(err) => {
                    self.warn(
                        entry_address.to_string(),
                        WarningKind::EntryUnreadable,
                        err.to_string(),
                    );
                    continue;
                }
            };
            match archive::open_bytes(bytes) {
                Ok(nested) => {
                    self.discovery.stats.archives_opened += 1;
                    stack.push(Frame {
                        archive: nested,
                        address: entry_address,
                        next: 0,
                    });
                }
                Err(err) => self.warn(
                    entry_address.to_string(),
                    WarningKind::ArchiveCorrupt,
                    format!("Invalid nested ZIP archive: {}", err),
                ),
            }
        }
    }
}
