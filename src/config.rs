use crate::error::{Error, Result};
use crate::filter::{FilterConfig, PathFilter};
use crate::policy::BatchingPolicy;
use std::fs;
use std::path::{Component, Path, PathBuf};

const DEFAULT_OUTPUT_DIR: &str = "dist";
const DEFAULT_SOURCE_EXTENSION: &str = ".mdx";
const DEFAULT_OUTPUT_EXTENSION: &str = ".md";
const DEFAULT_FALLBACK_PREFIX: &str = "concatenated";
const DEFAULT_MAX_NAME_STEMS: usize = 3;

/// Configuration for a docpack run.
///
/// Use [`Config::builder()`] to construct a new configuration. A built
/// configuration is validated and never changes for the rest of the run.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Root directory to scan for files
    pub root_dir: PathBuf,

    /// Output directory, cleared and recreated on each run
    pub output_dir: PathBuf,

    /// Extension of source files, including the leading dot (e.g. `.mdx`)
    pub source_extension: String,

    /// Extension of generated files, including the leading dot
    pub output_extension: String,

    /// How files are grouped into batches
    pub policy: BatchingPolicy,

    /// Number of leading file stems used to name a size-bounded batch
    pub max_name_stems: usize,

    /// Prefix for batches that cannot be named from their contents
    pub fallback_prefix: String,

    /// Sort directory entries by name instead of listing order
    pub sort_entries: bool,

    /// Path exclusion patterns
    pub filter_config: FilterConfig,

    /// Dry run mode (no file writes)
    pub dry_run: bool,
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use docpack::{BatchingPolicy, Config};
    ///
    /// let config = Config::builder()
    ///     .root_dir(".")
    ///     .policy(BatchingPolicy::DirectoryGrouped)
    ///     .build()
    ///     .expect("valid configuration");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// The root directory itself is not checked here; a missing root is
    /// reported by the scanner as an IO error.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An extension is empty or just a dot
    /// - The output directory is the scan root or one of its ancestors
    /// - No stems are allowed in batch names
    /// - An exclusion pattern is not a valid glob
    pub fn validate(&self) -> Result<()> {
        for (name, ext) in [
            ("source_extension", &self.source_extension),
            ("output_extension", &self.output_extension),
        ] {
            if !ext.starts_with('.') || ext.len() < 2 {
                return Err(Error::config(format!(
                    "{name} must be a dot followed by at least one character, got '{ext}'"
                )));
            }
        }

        let root = resolve(&self.root_dir)?;
        let output = resolve(&self.output_dir)?;
        if root.starts_with(&output) {
            return Err(Error::config(format!(
                "Output directory {} would remove the scan root {}",
                self.output_dir.display(),
                self.root_dir.display()
            )));
        }

        if self.max_name_stems == 0 {
            return Err(Error::config("max_name_stems must be greater than 0"));
        }

        if self.fallback_prefix.is_empty() {
            return Err(Error::config("fallback_prefix must not be empty"));
        }

        PathFilter::new(&self.filter_config)?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            output_extension: DEFAULT_OUTPUT_EXTENSION.to_string(),
            policy: BatchingPolicy::default(),
            max_name_stems: DEFAULT_MAX_NAME_STEMS,
            fallback_prefix: DEFAULT_FALLBACK_PREFIX.to_string(),
            sort_entries: false,
            filter_config: FilterConfig::default(),
            dry_run: false,
        }
    }
}

/// Builder for creating a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    root_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    source_extension: Option<String>,
    output_extension: Option<String>,
    policy: Option<BatchingPolicy>,
    max_name_stems: Option<usize>,
    fallback_prefix: Option<String>,
    sort_entries: bool,
    filter_config: Option<FilterConfig>,
    dry_run: bool,
}

impl ConfigBuilder {
    /// Sets the root directory to scan.
    #[must_use]
    pub fn root_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.root_dir = Some(path.into());
        self
    }

    /// Sets the output directory for generated files.
    #[must_use]
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Sets the source file extension. A missing leading dot is added.
    #[must_use]
    pub fn source_extension(mut self, ext: impl Into<String>) -> Self {
        self.source_extension = Some(normalize_extension(ext.into()));
        self
    }

    /// Sets the output file extension. A missing leading dot is added.
    #[must_use]
    pub fn output_extension(mut self, ext: impl Into<String>) -> Self {
        self.output_extension = Some(normalize_extension(ext.into()));
        self
    }

    /// Sets the batching policy.
    #[must_use]
    pub fn policy(mut self, policy: BatchingPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Sets how many leading stems name a size-bounded batch.
    #[must_use]
    pub fn max_name_stems(mut self, count: usize) -> Self {
        self.max_name_stems = Some(count);
        self
    }

    /// Sets the prefix used when a batch cannot be named from its contents.
    #[must_use]
    pub fn fallback_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.fallback_prefix = Some(prefix.into());
        self
    }

    /// Visits directory entries sorted by file name.
    #[must_use]
    pub fn sort_entries(mut self, enabled: bool) -> Self {
        self.sort_entries = enabled;
        self
    }

    /// Sets the path exclusion configuration.
    #[must_use]
    pub fn filter_config(mut self, config: FilterConfig) -> Self {
        self.filter_config = Some(config);
        self
    }

    /// Enables dry run mode (no file writes).
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn build(self) -> Result<Config> {
        let config = Config {
            root_dir: self.root_dir.unwrap_or_else(|| PathBuf::from(".")),
            output_dir: self
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            source_extension: self
                .source_extension
                .unwrap_or_else(|| DEFAULT_SOURCE_EXTENSION.to_string()),
            output_extension: self
                .output_extension
                .unwrap_or_else(|| DEFAULT_OUTPUT_EXTENSION.to_string()),
            policy: self.policy.unwrap_or_default(),
            max_name_stems: self.max_name_stems.unwrap_or(DEFAULT_MAX_NAME_STEMS),
            fallback_prefix: self
                .fallback_prefix
                .unwrap_or_else(|| DEFAULT_FALLBACK_PREFIX.to_string()),
            sort_entries: self.sort_entries,
            filter_config: self.filter_config.unwrap_or_default(),
            dry_run: self.dry_run,
        };

        config.validate()?;
        Ok(config)
    }
}

/// Absolute, symlink-free form of `path`. Missing trailing components are
/// folded lexically onto the deepest existing ancestor.
fn resolve(path: &Path) -> Result<PathBuf> {
    if let Ok(canonical) = fs::canonicalize(path) {
        return Ok(canonical);
    }

    let absolute = std::path::absolute(path).map_err(|e| Error::io(path, e))?;
    let mut lexical = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                lexical.pop();
            }
            other => lexical.push(other),
        }
    }

    let mut missing = Vec::new();
    let mut existing = lexical.as_path();
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_owned());
                existing = parent;
            }
            _ => return Ok(lexical),
        }
    }

    let mut resolved = fs::canonicalize(existing).map_err(|e| Error::io(existing, e))?;
    resolved.extend(missing.iter().rev());
    Ok(resolved)
}

fn normalize_extension(ext: String) -> String {
    if ext.starts_with('.') || ext.is_empty() {
        ext
    } else {
        format!(".{ext}")
    }
}
