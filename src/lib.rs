//! # docpack
//!
//! Repacks a tree of documentation files into a handful of larger files for
//! tools with per-file size limits.
//!
//! ## Features
//!
//! - Depth-first scan for one file extension (`.mdx` by default)
//! - Word-bounded batching or one batch per directory
//! - Provenance header before every source file
//! - Output names derived from the batched files or their directory
//!
//! ## Quick Start
//!
//! ```no_run
//! use docpack::{BatchingPolicy, Config, Pipeline};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::builder()
//!     .root_dir("./docs")
//!     .output_dir("./dist")
//!     .policy(BatchingPolicy::size_bounded(5_000)?)
//!     .build()?;
//!
//! Pipeline::new(config)?.run()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! 1. **Writer**: clears and recreates the output directory
//! 2. **Scanner**: collects matching files in discovery order
//! 3. **Planner**: groups files into batches
//! 4. **Naming**: derives an output file name per batch
//! 5. **Writer**: writes each batch's concatenated content

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod error;
mod file;
mod filter;
mod naming;
mod pipeline;
mod planner;
mod policy;
mod scanner;
mod words;
mod writer;

pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use file::{render_block, SourceFile};
pub use filter::FilterConfig;
pub use naming::{sanitize, NameSynthesizer};
pub use pipeline::{Pipeline, RunStats};
pub use planner::{Batch, BatchPlanner};
pub use policy::{BatchingPolicy, DEFAULT_WORDS_PER_FILE, FOLDER_KEYWORD};
pub use words::count_words;
pub use writer::OutputArtifact;

/// Runs a complete pipeline with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - The root directory doesn't exist or can't be read
/// - A source file can't be read
/// - The output directory or a file in it can't be written
///
/// # Examples
///
/// ```no_run
/// use docpack::{Config, run};
///
/// # fn main() -> anyhow::Result<()> {
/// let config = Config::builder()
///     .root_dir("./docs")
///     .build()?;
///
/// run(config)?;
/// # Ok(())
/// # }
/// ```
pub fn run(config: Config) -> Result<RunStats> {
    Pipeline::new(config)?.run()
}
