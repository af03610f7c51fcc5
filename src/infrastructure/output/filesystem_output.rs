//! Filesystem-based output sink implementation

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::generation::{GenerationError, GeneratedUnit, OutputSink};

/// Output sink that writes units as files into one directory
pub struct FileSystemOutputSink {
    root: PathBuf,
}

impl FileSystemOutputSink {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn io_error(action: &str, path: &Path, e: std::io::Error) -> GenerationError {
        GenerationError::IoError(std::io::Error::new(
            e.kind(),
            format!("Failed to {action} {}: {e}", path.display()),
        ))
    }
}

impl OutputSink for FileSystemOutputSink {
    fn write_units(&self, units: &[GeneratedUnit]) -> Result<(), GenerationError> {
        fs::create_dir_all(&self.root)
            .map_err(|e| Self::io_error("create directory", &self.root, e))?;

        for unit in units {
            let path = self.root.join(&unit.hint_name);

            let mut file =
                fs::File::create(&path).map_err(|e| Self::io_error("create file", &path, e))?;
            file.write_all(unit.text.as_bytes())
                .map_err(|e| Self::io_error("write file", &path, e))?;
            file.flush()
                .map_err(|e| Self::io_error("flush file", &path, e))?;

            tracing::debug!(path = %path.display(), "Wrote generated unit");
        }

        Ok(())
    }
}
