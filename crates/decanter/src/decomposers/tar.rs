//! Tar archive decomposer.

use crate::Result;
use crate::extraction::archive::walk_tar_files;
use crate::plugins::{DecomposeContext, Decomposer, Emit, Plugin};
use crate::types::{Data, Record, RecordInfo};

pub const TAR_KEY: &str = "tar";
pub const TAR_EXTENSION: &str = "tar";
pub const TAR_MIME_TYPE: &str = "application/x-tar";

/// Splits a tar archive into one virtual entry per regular file.
///
/// Entries are emitted in physical order and are read lazily: each entry's stream is
/// bound to the archive and only valid while `emit` runs.
pub struct TarDecomposer;

impl TarDecomposer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TarDecomposer {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for TarDecomposer {
    fn name(&self) -> &str {
        TAR_KEY
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    fn description(&self) -> &str {
        "Splits tar archives into their file entries"
    }

    fn author(&self) -> &str {
        "Decanter Team"
    }
}

impl Decomposer for TarDecomposer {
    fn target(&self, info: &RecordInfo) -> bool {
        info.extension() == Some(TAR_EXTENSION) || info.mime_type() == Some(TAR_MIME_TYPE)
    }

    fn decompose(&self, data: Data<'_>, ctx: &DecomposeContext<'_>, emit: &mut Emit<'_>) -> Result<()> {
        let source = data.info().clone();
        let reader = data.into_reader()?;

        walk_tar_files(reader, |path, entry| {
            tracing::debug!(archive = %source.describe(), entry = path, "Emitting tar entry");
            let entry = Data::virtual_entry(path, ctx.meter(entry), &source);
            emit(Record::Data(entry))
        })
    }
}
