use crate::{
    error::Result,
    file::SourceFile,
    policy::BatchingPolicy,
    words::count_words,
};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, trace};

/// A group of source files written together as one output file.
#[derive(Debug, Clone, Serialize)]
pub struct Batch {
    /// Sequential batch index (1-based)
    pub index: usize,

    /// Member files in assignment order
    pub files: Vec<SourceFile>,

    /// Concatenated provenance blocks of all members
    #[serde(skip)]
    pub content: String,

    /// Sum of the members' block word counts
    pub word_count: usize,

    /// Source directory (relative to the scan root) for directory-grouped batches
    pub group: Option<PathBuf>,
}

impl Batch {
    /// Returns the number of files in this batch.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Returns true if this batch has no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Returns member stems in assignment order.
    pub fn stems(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.stem.as_str())
    }
}

/// Decides which files go into which output batch.
#[derive(Debug, Clone, Copy)]
pub struct BatchPlanner {
    policy: BatchingPolicy,
}

impl BatchPlanner {
    /// Creates a planner for the given policy.
    #[must_use]
    pub const fn new(policy: BatchingPolicy) -> Self {
        Self { policy }
    }

    /// Assigns every file to exactly one batch, reading each file once.
    ///
    /// # Algorithm
    ///
    /// - **Size-bounded**: files accumulate into the current batch, which
    ///   closes as soon as its word count reaches the threshold or the
    ///   input runs out. A file is never split, so a file larger than the
    ///   threshold closes a batch of one.
    /// - **Directory-grouped**: one batch per source directory, in the
    ///   order directories are first seen, with no size limit.
    ///
    /// No files means no batches.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read.
    pub fn plan(&self, files: Vec<SourceFile>) -> Result<Vec<Batch>> {
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let batches = match self.policy {
            BatchingPolicy::SizeBounded { threshold } => {
                Self::plan_size_bounded(files, threshold.get())?
            }
            BatchingPolicy::DirectoryGrouped => Self::plan_directory_grouped(files)?,
        };

        Self::log_plan_results(&batches);

        Ok(batches)
    }

    fn plan_size_bounded(files: Vec<SourceFile>, threshold: usize) -> Result<Vec<Batch>> {
        let total = files.len();
        let mut batches = Vec::new();
        let mut current = BatchBuilder::new(None);

        for (position, file) in files.into_iter().enumerate() {
            current.add_file(file)?;

            let is_last = position + 1 == total;
            if current.word_count >= threshold || is_last {
                let closed = std::mem::replace(&mut current, BatchBuilder::new(None));
                if let Some(batch) = closed.build(batches.len() + 1) {
                    trace!(
                        "Closed batch {} with {} files ({} words)",
                        batch.index,
                        batch.file_count(),
                        batch.word_count
                    );
                    batches.push(batch);
                }
            }
        }

        // Every path through the loop ends by closing on the last file.
        if let Some(batch) = current.build(batches.len() + 1) {
            batches.push(batch);
        }

        Ok(batches)
    }

    fn plan_directory_grouped(files: Vec<SourceFile>) -> Result<Vec<Batch>> {
        let mut groups: Vec<BatchBuilder> = Vec::new();
        let mut positions: HashMap<PathBuf, usize> = HashMap::new();

        for file in files {
            let position = *positions
                .entry(file.relative_dir.clone())
                .or_insert_with(|| {
                    groups.push(BatchBuilder::new(Some(file.relative_dir.clone())));
                    groups.len() - 1
                });

            groups[position].add_file(file)?;
        }

        Ok(groups
            .into_iter()
            .enumerate()
            .filter_map(|(i, builder)| builder.build(i + 1))
            .collect())
    }

    fn log_plan_results(batches: &[Batch]) {
        let total_files: usize = batches.iter().map(Batch::file_count).sum();
        let total_words: usize = batches.iter().map(|b| b.word_count).sum();

        debug!(
            "Planned {} batches from {} files ({} words)",
            batches.len(),
            total_files,
            total_words
        );
    }
}

/// Accumulates one batch incrementally.
struct BatchBuilder {
    files: Vec<SourceFile>,
    content: String,
    word_count: usize,
    group: Option<PathBuf>,
}

impl BatchBuilder {
    fn new(group: Option<PathBuf>) -> Self {
        Self {
            files: Vec::new(),
            content: String::new(),
            word_count: 0,
            group,
        }
    }

    /// Reads `file`, appends its provenance block and counts its words.
    fn add_file(&mut self, file: SourceFile) -> Result<()> {
        let block = file.render()?;
        let words = count_words(&block);

        trace!("Added {} ({} words)", file.path.display(), words);

        self.word_count += words;
        self.content.push_str(&block);
        self.files.push(file);
        Ok(())
    }

    /// Seals the batch; empty builders produce nothing.
    fn build(self, index: usize) -> Option<Batch> {
        if self.files.is_empty() {
            None
        } else {
            Some(Batch {
                index,
                files: self.files,
                content: self.content,
                word_count: self.word_count,
                group: self.group,
            })
        }
    }
}
