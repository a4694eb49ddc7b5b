//! Container entry walking.
//!
//! Tar archives are read sequentially and expose each regular file as a stream.
//! Zip packages are read through their central directory.

use crate::error::{BudgetExhausted, DecanterError, Result};
use std::io::{ErrorKind, Read, Seek};
use tar::Archive as TarArchive;
use zip::ZipArchive;

/// Visit every regular file of a tar archive in physical order.
///
/// `visit` receives the entry's full path and a reader positioned at its content.
/// Directories, links and other special entries are skipped. Content left unread by
/// `visit` is skipped when the walk moves on.
pub fn walk_tar_files<R, F>(reader: R, mut visit: F) -> Result<()>
where
    R: Read,
    F: FnMut(&str, &mut dyn Read) -> Result<()>,
{
    let mut archive = TarArchive::new(reader);
    let entries = archive.entries().map_err(|e| tar_error("Failed to read TAR archive", e))?;

    for entry_result in entries {
        let mut entry = entry_result.map_err(|e| tar_error("Failed to read TAR entry", e))?;

        if !entry.header().entry_type().is_file() {
            continue;
        }

        let path = entry
            .path()
            .map_err(|e| tar_error("Failed to read TAR entry path", e))?
            .to_string_lossy()
            .into_owned();

        visit(&path, &mut entry)?;
    }

    Ok(())
}

/// Visit every file entry of a zip archive in central directory order.
pub fn walk_zip_files<R, F>(reader: R, mut visit: F) -> Result<()>
where
    R: Read + Seek,
    F: FnMut(&str, &mut dyn Read) -> Result<()>,
{
    let mut archive = ZipArchive::new(reader)?;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        let name = file.name().to_string();
        visit(&name, &mut file)?;
    }

    Ok(())
}

/// Classify an error raised by the tar reader.
///
/// The tar crate reports structural corruption as `io::Error`, including bare `Other`
/// errors for bad headers, so those become `MalformedContainer` as well.
fn tar_error(context: &str, err: std::io::Error) -> DecanterError {
    let exhausted = err.get_ref().is_some_and(|inner| inner.is::<BudgetExhausted>());
    if err.kind() == ErrorKind::Other && !exhausted {
        return DecanterError::malformed_container_with_source(format!("{}: {}", context, err), err);
    }
    DecanterError::from_entry_read(context, err)
}
