use crate::{
    config::Config,
    error::Result,
    naming::NameSynthesizer,
    planner::{Batch, BatchPlanner},
    scanner::Scanner,
    writer::{OutputArtifact, Writer},
};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// Statistics collected during a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    /// Policy applied, in human-readable form
    pub policy: String,

    /// Number of source files found
    pub total_files: usize,

    /// Number of batches planned
    pub total_batches: usize,

    /// Words across all batches
    pub total_words: usize,

    /// Average words per batch
    pub avg_words_per_batch: usize,

    /// Largest batch in words
    pub max_batch_words: usize,

    /// Smallest batch in words
    pub min_batch_words: usize,

    /// Output file names in write order
    pub artifacts: Vec<String>,

    /// Number of files written (0 in dry run mode)
    pub files_written: usize,

    /// Output directory path
    pub output_directory: String,

    /// Total execution time
    pub duration: Duration,

    /// Time spent scanning
    pub scan_duration: Duration,

    /// Time spent planning (includes reading sources)
    pub plan_duration: Duration,

    /// Time spent writing
    pub write_duration: Duration,

    /// Completion timestamp
    pub generated_at: String,
}

impl RunStats {
    fn new(
        config: &Config,
        total_files: usize,
        batches: &[Batch],
        artifacts: Vec<String>,
        files_written: usize,
        timings: Timings,
    ) -> Self {
        let total_batches = batches.len();
        let total_words: usize = batches.iter().map(|b| b.word_count).sum();

        let avg_words_per_batch = if total_batches > 0 {
            total_words / total_batches
        } else {
            0
        };

        Self {
            policy: config.policy.to_string(),
            total_files,
            total_batches,
            total_words,
            avg_words_per_batch,
            max_batch_words: batches.iter().map(|b| b.word_count).max().unwrap_or(0),
            min_batch_words: batches.iter().map(|b| b.word_count).min().unwrap_or(0),
            artifacts,
            files_written,
            output_directory: config.output_dir.display().to_string(),
            duration: timings.total,
            scan_duration: timings.scan,
            plan_duration: timings.plan,
            write_duration: timings.write,
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Prints a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!();
        println!("Policy:           {}", self.policy);
        println!("Files found:      {:>8}", self.total_files);
        println!("Batches:          {:>8}", self.total_batches);
        println!("Total words:      {:>8}", self.total_words);
        println!("Avg words/batch:  {:>8}", self.avg_words_per_batch);
        println!("Min batch:        {:>8} words", self.min_batch_words);
        println!("Max batch:        {:>8} words", self.max_batch_words);
        println!("Files written:    {:>8}", self.files_written);
        println!("Output directory: {}", self.output_directory);
        println!(
            "Timing:           scan {:.2}s, plan {:.2}s, write {:.2}s, total {:.2}s",
            self.scan_duration.as_secs_f64(),
            self.plan_duration.as_secs_f64(),
            self.write_duration.as_secs_f64(),
            self.duration.as_secs_f64()
        );
        println!();
    }

    /// Serializes the statistics as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Timings {
    total: Duration,
    scan: Duration,
    plan: Duration,
    write: Duration,
}

/// Runs a complete scan, plan and write cycle.
pub struct Pipeline {
    config: Config,
    scanner: Scanner,
    planner: BatchPlanner,
    names: NameSynthesizer,
    writer: Writer,
}

impl Pipeline {
    /// Creates a new pipeline with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let scanner = Scanner::new(&config)?;
        let planner = BatchPlanner::new(config.policy);
        let names = NameSynthesizer::new(&config);
        let writer = Writer::new(&config);

        Ok(Self {
            config,
            scanner,
            planner,
            names,
            writer,
        })
    }

    /// Executes the pipeline and returns statistics.
    ///
    /// # Process
    ///
    /// 1. **Reset**: clears and recreates the output directory
    /// 2. **Scan**: collects matching files in discovery order
    /// 3. **Plan**: groups files into batches under the configured policy
    /// 4. **Write**: names each batch and writes it to the output directory
    ///
    /// In dry run mode the output directory is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error on the first failing filesystem operation. Files
    /// written before the failure are left in place.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use docpack::{Config, Pipeline};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = Config::builder()
    ///     .root_dir("./docs")
    ///     .build()?;
    ///
    /// let stats = Pipeline::new(config)?.run()?;
    /// stats.print_summary();
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self), fields(root_dir = %self.config.root_dir.display()))]
    pub fn run(self) -> Result<RunStats> {
        let start_time = Instant::now();
        let mut timings = Timings::default();

        info!("Starting run with {} batching", self.config.policy);

        if self.config.dry_run {
            warn!("Dry run mode enabled - output directory is left untouched");
        } else {
            self.writer.prepare()?;
        }

        let scan_start = Instant::now();
        let files = self.scanner.scan()?;
        timings.scan = scan_start.elapsed();
        let total_files = files.len();

        info!(
            "Found {} '{}' files in {:.2}s",
            total_files,
            self.config.source_extension,
            timings.scan.as_secs_f64()
        );

        let plan_start = Instant::now();
        let batches = self.planner.plan(files)?;
        timings.plan = plan_start.elapsed();

        info!(
            "Planned {} batches in {:.2}s",
            batches.len(),
            timings.plan.as_secs_f64()
        );

        let write_start = Instant::now();
        let mut artifacts = Vec::with_capacity(batches.len());
        let mut files_written = 0;

        for batch in &batches {
            let name = self.names.name(batch);

            if self.config.dry_run {
                info!(
                    "Would create {} ({} files, {} words)",
                    name,
                    batch.file_count(),
                    batch.word_count
                );
            } else {
                let path = self.names.output_path(self.writer.output_dir(), &name);
                self.writer.write(&OutputArtifact::new(path, batch.content.as_str()))?;
                files_written += 1;
            }

            artifacts.push(name);
        }
        timings.write = write_start.elapsed();
        timings.total = start_time.elapsed();

        if !self.config.dry_run {
            info!(
                "Files have been concatenated and saved in \"{}\"",
                self.config.output_dir.display()
            );
        }

        Ok(RunStats::new(
            &self.config,
            total_files,
            &batches,
            artifacts,
            files_written,
            timings,
        ))
    }
}
