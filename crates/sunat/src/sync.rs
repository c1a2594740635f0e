//! Mirror an organized document tree into a cloud store.
//!
//! The store is reached through [`CloudStore`]: list, create folder, upload.
//! Every call may fail on its own; a failed folder or file is logged and
//! counted and the sync moves on. Authentication and retries belong to the
//! concrete store.

use serde::Serialize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Local directory does not exist: {}", .0.display())]
    LocalMissing(PathBuf),

    #[error("Invalid remote path: {0}")]
    InvalidRemotePath(String),

    #[error("Remote path not found: {0}")]
    RemoteNotFound(String),

    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SyncError>;

/// One child of a remote folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteEntry {
    pub name: String,
    pub is_folder: bool,
}

/// Remote storage reached by the sync. Paths are `/`-separated and rooted.
pub trait CloudStore {
    fn list_entries(&self, path: &str) -> Result<Vec<RemoteEntry>>;
    fn create_folder(&self, path: &str) -> Result<()>;
    fn upload_file(&self, local: &Path, remote: &str) -> Result<()>;
}

/// `/parent/name`, tolerating a trailing slash on `parent`.
pub fn join_remote(parent: &str, name: &str) -> String {
    let parent = parent.trim_end_matches('/');
    format!("{}/{}", parent, name)
}

/// Create `parent/name` unless a folder with that name is already listed.
///
/// Returns whether the folder was created.
pub fn ensure_folder(store: &dyn CloudStore, parent: &str, name: &str) -> Result<bool> {
    let exists = store
        .list_entries(parent)?
        .iter()
        .any(|entry| entry.is_folder && entry.name == name);
    if exists {
        info!(parent, name, "Remote folder already exists");
        return Ok(false);
    }
    store.create_folder(&join_remote(parent, name))?;
    info!(parent, name, "Remote folder created");
    Ok(true)
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub folders_created: usize,
    pub uploaded: usize,
    pub failed: usize,
    pub failures: Vec<String>,
}

impl SyncReport {
    fn fail(&mut self, message: String) {
        self.failed += 1;
        self.failures.push(message);
    }
}

/// Upload every immediate subfolder of `local_root` into `/<remote_folder>`.
///
/// Fails only when `local_root` is missing or the base folder cannot be
/// ensured.
pub fn sync_tree(
    store: &dyn CloudStore,
    local_root: &Path,
    remote_folder: &str,
) -> Result<SyncReport> {
    if !local_root.is_dir() {
        return Err(SyncError::LocalMissing(local_root.to_path_buf()));
    }
    let mut report = SyncReport::default();
    if ensure_folder(store, "/", remote_folder)? {
        report.folders_created += 1;
    }
    let base = join_remote("/", remote_folder);

    let mut folders: Vec<PathBuf> = read_dir_paths(local_root)?
        .into_iter()
        .filter(|p| p.is_dir())
        .collect();
    folders.sort();

    for folder in folders {
        let Some(name) = folder.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        match ensure_folder(store, &base, &name) {
            Ok(true) => report.folders_created += 1,
            Ok(false) => {}
            Err(err) => {
                warn!(folder = %name, error = %err, "Could not create remote folder, skipping");
                report.fail(format!("folder {}: {}", name, err));
                continue;
            }
        }
        let remote_dir = join_remote(&base, &name);
        let files = match read_dir_paths(&folder) {
            Ok(paths) => paths,
            Err(err) => {
                report.fail(format!("folder {}: {}", name, err));
                continue;
            }
        };
        for file in files.into_iter().filter(|p| p.is_file()) {
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let target = join_remote(&remote_dir, &file_name);
            match store.upload_file(&file, &target) {
                Ok(()) => {
                    info!(file = %file.display(), remote = %target, "Uploaded");
                    report.uploaded += 1;
                }
                Err(err) => {
                    error!(file = %file.display(), error = %err, "Upload failed");
                    report.fail(format!("{}: {}", file.display(), err));
                }
            }
        }
    }

    info!(
        uploaded = report.uploaded,
        failed = report.failed,
        "Sync complete"
    );
    Ok(report)
}

fn read_dir_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| SyncError::Io {
        path: dir.display().to_string(),
        source,
    })?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| SyncError::Io {
            path: dir.display().to_string(),
            source,
        })?;
        paths.push(entry.path());
    }
    Ok(paths)
}

/// A local directory standing in for the remote root, such as a mounted or
/// desktop-synced cloud drive.
#[derive(Debug, Clone)]
pub struct MirrorStore {
    root: PathBuf,
}

impl MirrorStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn local_path(&self, remote: &str) -> Result<PathBuf> {
        let mut path = self.root.clone();
        for part in remote.split('/').filter(|p| !p.is_empty()) {
            let mut components = Path::new(part).components();
            match (components.next(), components.next()) {
                (Some(Component::Normal(_)), None) => path.push(part),
                _ => return Err(SyncError::InvalidRemotePath(remote.to_string())),
            }
        }
        Ok(path)
    }
}

impl CloudStore for MirrorStore {
    fn list_entries(&self, path: &str) -> Result<Vec<RemoteEntry>> {
        let dir = self.local_path(path)?;
        if !dir.is_dir() {
            return Err(SyncError::RemoteNotFound(path.to_string()));
        }
        let mut entries: Vec<RemoteEntry> = read_dir_paths(&dir)?
            .into_iter()
            .filter_map(|p| {
                let name = p.file_name()?.to_string_lossy().into_owned();
                Some(RemoteEntry {
                    name,
                    is_folder: p.is_dir(),
                })
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn create_folder(&self, path: &str) -> Result<()> {
        let dir = self.local_path(path)?;
        fs::create_dir_all(&dir).map_err(|source| SyncError::Io {
            path: path.to_string(),
            source,
        })
    }

    fn upload_file(&self, local: &Path, remote: &str) -> Result<()> {
        let target = self.local_path(remote)?;
        fs::copy(local, &target)
            .map(|_| ())
            .map_err(|source| SyncError::Io {
                path: remote.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    #[test]
    fn join_remote_handles_root() {
        assert_eq!(join_remote("/", "SUNAT_Documentos"), "/SUNAT_Documentos");
        assert_eq!(join_remote("/SUNAT_Documentos", "Facturas"), "/SUNAT_Documentos/Facturas");
        assert_eq!(join_remote("/a/", "b"), "/a/b");
    }

    #[test]
    fn mirror_rejects_parent_components() {
        let temp = TempDir::new().unwrap();
        let store = MirrorStore::new(temp.path());
        assert!(matches!(
            store.create_folder("/../escape"),
            Err(SyncError::InvalidRemotePath(_))
        ));
    }

    #[test]
    fn ensure_folder_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let store = MirrorStore::new(temp.path());
        assert!(ensure_folder(&store, "/", "SUNAT_Documentos").unwrap());
        assert!(!ensure_folder(&store, "/", "SUNAT_Documentos").unwrap());
        assert!(temp.path().join("SUNAT_Documentos").is_dir());
    }

    #[test]
    fn sync_tree_mirrors_subfolders() {
        let local = TempDir::new().unwrap();
        let remote = TempDir::new().unwrap();
        fs::create_dir_all(local.path().join("Facturas")).unwrap();
        fs::create_dir_all(local.path().join("Boletas")).unwrap();
        fs::write(local.path().join("Facturas").join("01-F001-1.pdf"), b"f").unwrap();
        fs::write(local.path().join("Boletas").join("03-B001-1.pdf"), b"b").unwrap();
        fs::write(local.path().join("loose.txt"), b"ignored").unwrap();

        let store = MirrorStore::new(remote.path());
        let report = sync_tree(&store, local.path(), "SUNAT_Documentos").unwrap();
        assert_eq!(report.uploaded, 2);
        assert_eq!(report.failed, 0);
        assert_eq!(report.folders_created, 3);
        let base = remote.path().join("SUNAT_Documentos");
        assert_eq!(fs::read(base.join("Facturas").join("01-F001-1.pdf")).unwrap(), b"f");
        assert!(!base.join("loose.txt").exists());
    }

    /// Store whose uploads of one name always fail.
    struct FlakyStore {
        inner: MirrorStore,
        reject: &'static str,
        attempts: RefCell<usize>,
    }

    impl CloudStore for FlakyStore {
        fn list_entries(&self, path: &str) -> Result<Vec<RemoteEntry>> {
            self.inner.list_entries(path)
        }

        fn create_folder(&self, path: &str) -> Result<()> {
            self.inner.create_folder(path)
        }

        fn upload_file(&self, local: &Path, remote: &str) -> Result<()> {
            *self.attempts.borrow_mut() += 1;
            if remote.ends_with(self.reject) {
                return Err(SyncError::RemoteNotFound(remote.to_string()));
            }
            self.inner.upload_file(local, remote)
        }
    }

    #[test]
    fn failed_upload_does_not_stop_sync() {
        let local = TempDir::new().unwrap();
        let remote = TempDir::new().unwrap();
        fs::create_dir_all(local.path().join("Facturas")).unwrap();
        fs::write(local.path().join("Facturas").join("01-F001-1.pdf"), b"1").unwrap();
        fs::write(local.path().join("Facturas").join("01-F001-2.pdf"), b"2").unwrap();

        let store = FlakyStore {
            inner: MirrorStore::new(remote.path()),
            reject: "01-F001-1.pdf",
            attempts: RefCell::new(0),
        };
        let report = sync_tree(&store, local.path(), "SUNAT_Documentos").unwrap();
        assert_eq!(*store.attempts.borrow(), 2);
        assert_eq!(report.uploaded, 1);
        assert_eq!(report.failed, 1);
    }

    #[test]
    fn missing_local_root_fails() {
        let temp = TempDir::new().unwrap();
        let store = MirrorStore::new(temp.path());
        assert!(matches!(
            sync_tree(&store, &temp.path().join("absent"), "X"),
            Err(SyncError::LocalMissing(_))
        ));
    }
}
