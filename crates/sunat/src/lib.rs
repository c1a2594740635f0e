//! SUNAT organizer - shared library for the `sunat` binary.
//!
//! Hosts the collaborators around the discovery core: the HTTP API and the
//! cloud-sync layer.

pub mod api;
pub mod sync;

pub use sync::{ensure_folder, sync_tree, CloudStore, MirrorStore, RemoteEntry, SyncReport};
