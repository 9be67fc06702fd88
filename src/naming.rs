//! Output file naming.
//!
//! Size-bounded batches are named after their first few file stems plus
//! the batch index (`intro_setup_faq_3.md`). Directory-grouped batches are
//! named after their directory (`guides.md`); two directories with the same
//! sanitized name map to the same file and the later batch overwrites.

use crate::config::Config;
use crate::planner::Batch;
use std::path::{Path, PathBuf};

/// Replaces every character outside ASCII letters and digits with `_`,
/// then lowercases the result.
#[must_use]
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Derives output file names for planned batches.
#[derive(Debug, Clone)]
pub struct NameSynthesizer {
    max_stems: usize,
    extension: String,
    fallback_prefix: String,
    root_name: Option<String>,
}

impl NameSynthesizer {
    /// Creates a synthesizer from configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            max_stems: config.max_name_stems,
            extension: config.output_extension.clone(),
            fallback_prefix: config.fallback_prefix.clone(),
            root_name: base_name(&config.root_dir),
        }
    }

    /// Returns the output file name for `batch`.
    #[must_use]
    pub fn name(&self, batch: &Batch) -> String {
        match &batch.group {
            Some(dir) => self.directory_name(dir),
            None => self.stems_name(batch.stems(), batch.index),
        }
    }

    /// Names a size-bounded batch from its stems and 1-based index.
    ///
    /// Falls back to `<prefix>_<index>` when there are no stems.
    #[must_use]
    pub fn stems_name<'a>(&self, stems: impl IntoIterator<Item = &'a str>, index: usize) -> String {
        let joined = stems
            .into_iter()
            .take(self.max_stems)
            .map(sanitize)
            .collect::<Vec<_>>()
            .join("_");

        if joined.is_empty() {
            return self.fallback_name(index);
        }

        format!("{joined}_{index}{}", self.extension)
    }

    /// Names a directory-grouped batch from its relative directory.
    ///
    /// Root-level files take the name of the scan root itself.
    #[must_use]
    pub fn directory_name(&self, relative_dir: &Path) -> String {
        let base = base_name(relative_dir)
            .or_else(|| self.root_name.clone())
            .unwrap_or_else(|| self.fallback_prefix.clone());

        format!("{}{}", sanitize(&base), self.extension)
    }

    /// Name for a batch that cannot be named from its contents.
    #[must_use]
    pub fn fallback_name(&self, index: usize) -> String {
        format!("{}_{index}{}", self.fallback_prefix, self.extension)
    }

    /// Joins a name onto the output directory.
    #[must_use]
    pub fn output_path(&self, output_dir: &Path, name: &str) -> PathBuf {
        output_dir.join(name)
    }
}

/// Last normal component of `path`, if any.
fn base_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}
