//! ZIP helpers shared by the walker, extractor and packager.

use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Anything a `ZipArchive` can sit on: a file on disk or bytes in memory.
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

pub type DynArchive = ZipArchive<Box<dyn ReadSeek>>;

/// Final component of an in-archive entry path.
pub fn bare_name(entry_path: &str) -> &str {
    entry_path
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(entry_path)
}

/// `.zip` suffix, any case.
pub fn is_zip_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() >= 4 && bytes[bytes.len() - 4..].eq_ignore_ascii_case(b".zip")
}

pub fn open_file(path: &Path) -> zip::result::ZipResult<DynArchive> {
    let file = File::open(path)?;
    ZipArchive::new(Box::new(file) as Box<dyn ReadSeek>)
}

pub fn open_bytes(bytes: Vec<u8>) -> zip::result::ZipResult<DynArchive> {
    ZipArchive::new(Box::new(Cursor::new(bytes)) as Box<dyn ReadSeek>)
}

/// Read the entry at `index` fully into memory.
pub fn read_entry(archive: &mut DynArchive, index: usize) -> zip::result::ZipResult<Vec<u8>> {
    let mut entry = archive.by_index(index)?;
    let mut buf = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut buf)?;
    Ok(buf)
}
