//! Byte extraction from arbitrarily nested archives, entirely in memory.

use crate::address::DocumentAddress;
use crate::archive::{self, DynArchive};
use crate::error::{Result, ScoutError};
use std::fs;
use std::io::{ErrorKind, Read};
use std::path::Path;
use zip::result::ZipError;

/// Return the bytes of the innermost entry named by `segments`.
///
/// With no segments the physical file itself is read. Each intermediate
/// segment is opened as an archive from the bytes read at the previous level.
pub fn extract(physical: &Path, segments: &[String]) -> Result<Vec<u8>> {
    if !physical.exists() {
        return Err(ScoutError::SourceMissing(physical.to_path_buf()));
    }
    let Some((last, parents)) = segments.split_last() else {
        return Ok(fs::read(physical)?);
    };

    let mut current = DocumentAddress::on_disk(physical);
    let mut level = archive::open_file(physical).map_err(|err| corrupt(&current, err))?;
    for segment in parents {
        let bytes = read_named(&mut level, &current, segment)?;
        current = current.join(segment);
        level = archive::open_bytes(bytes).map_err(|err| corrupt(&current, err))?;
    }
    read_named(&mut level, &current, last)
}

/// Extract the document a composite address points at.
pub fn extract_address(address: &DocumentAddress) -> Result<Vec<u8>> {
    extract(address.physical(), address.segments())
}

fn read_named(archive: &mut DynArchive, at: &DocumentAddress, name: &str) -> Result<Vec<u8>> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => {
            return Err(ScoutError::EntryNotFound {
                address: at.to_string(),
                entry: name.to_string(),
            })
        }
        Err(err) => return Err(corrupt(at, err)),
    };
    let mut buf = Vec::with_capacity(entry.size() as usize);
    entry
        .read_to_end(&mut buf)
        .map_err(|err| ScoutError::ArchiveCorrupt {
            address: at.join(name).to_string(),
            reason: err.to_string(),
        })?;
    Ok(buf)
}

fn corrupt(at: &DocumentAddress, err: ZipError) -> ScoutError {
    match err {
        ZipError::Io(io) if io.kind() == ErrorKind::NotFound => {
            ScoutError::SourceMissing(at.physical().to_path_buf())
        }
        other => ScoutError::ArchiveCorrupt {
            address: at.to_string(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn segs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn reads_plain_file_without_segments() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("01-F001-1.pdf");
        std::fs::write(&path, b"factura").unwrap();
        assert_eq!(extract(&path, &[]).unwrap(), b"factura");
    }

    #[test]
    fn reads_through_two_levels() {
        let temp = TempDir::new().unwrap();
        let inner = zip_bytes(&[("docs/03-B001-15.pdf", b"boleta")]);
        let outer = zip_bytes(&[("inner.zip", &inner)]);
        let path = temp.path().join("outer.zip");
        std::fs::write(&path, outer).unwrap();

        let bytes = extract(&path, &segs(&["inner.zip", "docs/03-B001-15.pdf"])).unwrap();
        assert_eq!(bytes, b"boleta");
    }

    #[test]
    fn absent_entry_is_entry_not_found() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("outer.zip");
        std::fs::write(&path, zip_bytes(&[("a.pdf", b"a")])).unwrap();

        let err = extract(&path, &segs(&["b.pdf"])).unwrap_err();
        assert!(matches!(err, ScoutError::EntryNotFound { ref entry, .. } if entry == "b.pdf"));
    }

    #[test]
    fn corrupt_nested_archive_is_archive_corrupt() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("outer.zip");
        std::fs::write(&path, zip_bytes(&[("inner.zip", b"not a zip")])).unwrap();

        let err = extract(&path, &segs(&["inner.zip", "x.pdf"])).unwrap_err();
        assert!(matches!(err, ScoutError::ArchiveCorrupt { ref address, .. } if address.ends_with("outer.zip:inner.zip")));
    }

    #[test]
    fn missing_physical_file_is_source_missing() {
        let temp = TempDir::new().unwrap();
        let err = extract(&temp.path().join("gone.zip"), &segs(&["a.pdf"])).unwrap_err();
        assert!(matches!(err, ScoutError::SourceMissing(_)));
    }
}
