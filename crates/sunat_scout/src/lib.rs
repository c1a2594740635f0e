//! SUNAT Scout - Document Discovery & Repackaging
//!
//! Scout finds SUNAT tax documents by filename, including documents buried
//! inside ZIP archives nested to any depth, and repackages the unique ones
//! into a single flat archive.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌───────────────┐
//! │ Directory / │     │  Scanner    │     │  Selection  │     │   Packager    │
//! │ nested ZIPs │────▶│ (classify + │────▶│  (UNIQUE    │────▶│ (extract →    │
//! │             │     │   dedup)    │     │   records)  │     │  flat ZIP)    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └───────────────┘
//! ```
//!
//! # Core Concepts
//!
//! - **DocumentKind**: one of the fixed SUNAT filename grammars
//! - **DocumentAddress**: physical path plus in-archive entry chain
//! - **DocumentStatus**: `UNIQUE` for the first sighting of a bare name in a run
//! - **ActionLog**: per-invocation record of packaging actions

pub mod action_log;
pub mod address;
pub mod archive;
pub mod classifier;
pub mod config;
pub mod dedup;
pub mod error;
pub mod extractor;
pub mod organizer;
pub mod packager;
pub mod patterns;
pub mod pipeline;
pub mod scan_path;
pub mod scanner;
pub mod types;

// Re-exports for convenience
pub use action_log::{ActionEntry, ActionLevel, ActionLog};
pub use address::{resolve, DocumentAddress};
pub use classifier::{classify, Classifier};
pub use config::{ApiConfig, SunatConfig, SyncConfig};
pub use dedup::SeenNames;
pub use error::{Result, ScoutError};
pub use extractor::extract;
pub use organizer::{organize, OrganizeReport};
pub use packager::{package, PackageOutcome, PackageReport};
pub use patterns::{DocumentPattern, PatternRegistry};
pub use pipeline::{process, ProcessRequest, ProcessSummary};
pub use scanner::{discover, Discovery, ScanConfig, ScanStats, ScanWarning, Scanner, WarningKind};
pub use types::{DocumentFields, DocumentKind, DocumentRecord, DocumentStatus};
