//! Path exclusion during directory scanning.

use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;

/// Glob patterns excluding files and directories from a scan.
///
/// Patterns are matched against paths relative to the scan root, so
/// `**/node_modules` or `drafts/*.mdx` work regardless of where the root
/// lives.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    exclude_files: Vec<String>,
    exclude_directories: Vec<String>,
}

impl FilterConfig {
    /// Creates an empty configuration that excludes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Excludes files matching any of the given patterns.
    #[must_use]
    pub fn exclude_files(mut self, patterns: Vec<String>) -> Self {
        self.exclude_files = patterns;
        self
    }

    /// Excludes directories (and everything beneath them) matching any of
    /// the given patterns.
    #[must_use]
    pub fn exclude_directories(mut self, patterns: Vec<String>) -> Self {
        self.exclude_directories = patterns;
        self
    }

    /// Returns true if no patterns are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exclude_files.is_empty() && self.exclude_directories.is_empty()
    }
}

/// Compiled form of [`FilterConfig`].
#[derive(Debug, Clone)]
pub(crate) struct PathFilter {
    exclude_files: GlobSet,
    exclude_directories: GlobSet,
}

impl PathFilter {
    /// Compiles the configured patterns.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any pattern is not a valid glob.
    pub(crate) fn new(config: &FilterConfig) -> Result<Self> {
        Ok(Self {
            exclude_files: Self::build_globset(&config.exclude_files)?,
            exclude_directories: Self::build_globset(&config.exclude_directories)?,
        })
    }

    fn build_globset(patterns: &[String]) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();

        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| {
                Error::config(format!("Invalid glob pattern '{pattern}': {e}"))
            })?;
            builder.add(glob);
        }

        builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build glob set: {e}")))
    }

    /// Returns true if the directory at `relative` should be skipped entirely.
    pub(crate) fn is_excluded_dir(&self, relative: &Path) -> bool {
        self.exclude_directories.is_match(relative)
    }

    /// Returns true if the file at `relative` should be skipped.
    pub(crate) fn is_excluded_file(&self, relative: &Path) -> bool {
        self.exclude_files.is_match(relative)
    }
}
