use crate::{
    config::Config,
    error::{Error, Result},
};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// One file to be written: a path and its full content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    /// Destination path
    pub path: PathBuf,

    /// Complete file content
    pub content: String,
}

impl OutputArtifact {
    /// Creates a new artifact.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Materializes artifacts under the output directory.
///
/// Writes go straight to the target path; an interrupted run can leave a
/// truncated file behind, which the next run's reset removes.
pub(crate) struct Writer {
    output_dir: PathBuf,
}

impl Writer {
    /// Creates a new writer from configuration.
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
        }
    }

    /// Returns the output directory.
    pub(crate) fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Deletes the output directory and everything in it, then recreates
    /// it empty.
    ///
    /// Failure to delete is ignored (the directory usually does not exist
    /// yet); failure to create is not.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub(crate) fn prepare(&self) -> Result<()> {
        if let Err(e) = fs::remove_dir_all(&self.output_dir) {
            debug!(
                "Could not clear {} (ignored): {}",
                self.output_dir.display(),
                e
            );
        }

        fs::create_dir_all(&self.output_dir).map_err(|e| Error::io(&self.output_dir, e))?;

        debug!("Prepared output directory {}", self.output_dir.display());
        Ok(())
    }

    /// Writes one artifact, creating parent directories as needed and
    /// overwriting any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created or the write fails.
    pub(crate) fn write(&self, artifact: &OutputArtifact) -> Result<()> {
        if let Some(parent) = artifact.path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        fs::write(&artifact.path, &artifact.content)
            .map_err(|e| Error::io(&artifact.path, e))?;

        info!("Created file: {}", artifact.path.display());
        Ok(())
    }
}
