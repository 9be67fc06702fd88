use anyhow::Context;
use clap::Parser;
use docpack::{BatchingPolicy, Config, Error, FilterConfig, Pipeline, DEFAULT_WORDS_PER_FILE};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "docpack",
    version,
    about = "Repack documentation files into a few word-bounded files",
    long_about = "Recursively collects documentation files (.mdx by default) under SOURCE \
    and concatenates them into larger files, each source prefixed with its path.\n\n\
    USAGE EXAMPLES:\n  \
      # Batches of at least 5000 words\n  \
      docpack ./docs\n\n  \
      # Batches of at least 20000 words\n  \
      docpack ./docs 20000\n\n  \
      # One output file per directory\n  \
      docpack ./docs folder"
)]
struct Cli {
    /// Root directory to scan
    #[arg(value_name = "SOURCE")]
    source: Option<PathBuf>,

    /// Word threshold per output file, or `folder` for one file per directory
    #[arg(value_name = "WORDS|folder", allow_negative_numbers = true)]
    policy: Option<String>,

    /// Output directory (deleted and recreated on every run)
    #[arg(short, long, default_value = "dist", value_name = "PATH")]
    out: PathBuf,

    /// Extension of the files to collect
    #[arg(short, long, default_value = ".mdx", value_name = "EXT")]
    ext: String,

    /// Skip directories matching this glob (relative to SOURCE, repeatable)
    #[arg(long = "exclude-dir", value_name = "GLOB")]
    exclude_dirs: Vec<String>,

    /// Skip files matching this glob (relative to SOURCE, repeatable)
    #[arg(long = "exclude-file", value_name = "GLOB")]
    exclude_files: Vec<String>,

    /// Visit directory entries in name order for reproducible output
    #[arg(long)]
    sort: bool,

    /// Plan batches without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Print run statistics as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    let Some(source) = cli.source else {
        eprintln!("{}. Please provide a source path as an argument.", Error::missing_argument("SOURCE"));
        return Ok(ExitCode::from(1));
    };

    let (policy, rejected) = BatchingPolicy::from_arg_lenient(cli.policy.as_deref());
    if let Some(e) = rejected {
        warn!("{e}; using {DEFAULT_WORDS_PER_FILE} words per file");
    }

    let config = Config::builder()
        .root_dir(source)
        .output_dir(cli.out)
        .source_extension(cli.ext)
        .policy(policy)
        .sort_entries(cli.sort)
        .dry_run(cli.dry_run)
        .filter_config(
            FilterConfig::new()
                .exclude_directories(cli.exclude_dirs)
                .exclude_files(cli.exclude_files),
        )
        .build()
        .context("Failed to build configuration")?;

    let stats = Pipeline::new(config)
        .context("Failed to create pipeline")?
        .run()
        .context("Run failed")?;

    if cli.json {
        println!("{}", stats.to_json()?);
    } else if cli.verbose > 0 {
        stats.print_summary();
    }

    Ok(ExitCode::SUCCESS)
}

fn setup_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::new("docpack=info"),
        1 => EnvFilter::new("docpack=debug"),
        _ => EnvFilter::new("docpack=trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false)
                .with_thread_ids(false),
        )
        .init();
}
