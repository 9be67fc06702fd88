use crate::{
    config::Config,
    error::{Error, Result},
    file::{has_extension, SourceFile},
    filter::PathFilter,
};
use std::cell::Cell;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

/// Statistics collected during scanning.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ScanStats {
    /// Regular files visited
    pub visited_files: usize,

    /// Files with the source extension
    pub matched_files: usize,

    /// Files or directories removed by exclusion patterns
    pub excluded: usize,
}

/// Walks the source tree and collects files with the source extension.
pub(crate) struct Scanner {
    root_dir: PathBuf,
    extension: String,
    sort_entries: bool,
    filter: PathFilter,
}

impl Scanner {
    /// Creates a new scanner from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an exclusion pattern is invalid.
    pub(crate) fn new(config: &Config) -> Result<Self> {
        if !config.filter_config.is_empty() {
            debug!("Exclusion patterns: {:?}", config.filter_config);
        }

        Ok(Self {
            root_dir: config.root_dir.clone(),
            extension: config.source_extension.clone(),
            sort_entries: config.sort_entries,
            filter: PathFilter::new(&config.filter_config)?,
        })
    }

    /// Scans the root directory depth-first and returns every matching file
    /// in discovery order.
    ///
    /// Entries within a directory come in the order the filesystem lists
    /// them unless sorting is enabled. Symbolic links are not followed.
    ///
    /// # Errors
    ///
    /// Returns an error if the root does not exist or any directory cannot
    /// be read.
    pub(crate) fn scan(&self) -> Result<Vec<SourceFile>> {
        let (files, stats) = self.scan_with_stats()?;

        debug!(
            "Scan complete: {} files visited, {} matched '{}', {} excluded",
            stats.visited_files, stats.matched_files, self.extension, stats.excluded
        );

        Ok(files)
    }

    pub(crate) fn scan_with_stats(&self) -> Result<(Vec<SourceFile>, ScanStats)> {
        debug!("Starting scan of {}", self.root_dir.display());

        let mut walker = WalkDir::new(&self.root_dir).follow_links(false);
        if self.sort_entries {
            walker = walker.sort_by_file_name();
        }

        let mut stats = ScanStats::default();
        let mut files = Vec::new();
        let excluded = Cell::new(0);

        let entries = walker.into_iter().filter_entry(|entry| {
            let keep = self.keep_entry(entry);
            if !keep {
                excluded.set(excluded.get() + 1);
            }
            keep
        });

        for entry in entries {
            let entry = entry.map_err(|e| Error::walk(&self.root_dir, &e))?;

            if entry.file_type().is_dir() {
                continue;
            }

            stats.visited_files += 1;

            if !has_extension(entry.path(), &self.extension) {
                trace!("Skipping {}", entry.path().display());
                continue;
            }

            stats.matched_files += 1;
            trace!("Found {}", entry.path().display());
            files.push(SourceFile::new(
                entry.into_path(),
                &self.root_dir,
                &self.extension,
            ));
        }

        stats.excluded = excluded.get();
        Ok((files, stats))
    }

    /// Applies exclusion patterns; the root itself is always kept.
    fn keep_entry(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return true;
        }

        let relative = self.relative(entry.path());
        if entry.file_type().is_dir() {
            !self.filter.is_excluded_dir(&relative)
        } else {
            !self.filter.is_excluded_file(&relative)
        }
    }

    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root_dir)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterConfig;
    use assert_fs::prelude::*;

    fn create_test_config(root: &Path) -> Config {
        Config::builder()
            .root_dir(root)
            .output_dir(root.join("dist"))
            .build()
            .unwrap()
    }

    fn stems(files: &[SourceFile]) -> Vec<&str> {
        files.iter().map(|f| f.stem.as_str()).collect()
    }

    #[test]
    fn test_scanner_finds_matching_files() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("intro.mdx").write_str("Intro").unwrap();
        temp.child("setup.mdx").write_str("Setup").unwrap();
        temp.child("notes.md").write_str("Notes").unwrap();
        temp.child("logo.png").write_binary(&[0u8; 16]).unwrap();

        let scanner = Scanner::new(&create_test_config(temp.path())).unwrap();
        let files = scanner.scan().unwrap();

        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|f| f.stem == "intro"));
        assert!(files.iter().any(|f| f.stem == "setup"));
    }

    #[test]
    fn test_scanner_nested_directories() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("index.mdx").write_str("root").unwrap();
        temp.child("guides/start.mdx").write_str("start").unwrap();
        temp.child("guides/deep/more/leaf.mdx").write_str("leaf").unwrap();
        temp.child("empty/dir/readme.txt").write_str("nope").unwrap();

        let scanner = Scanner::new(&create_test_config(temp.path())).unwrap();
        let files = scanner.scan().unwrap();

        assert_eq!(files.len(), 3);
        let leaf = files.iter().find(|f| f.stem == "leaf").unwrap();
        assert_eq!(leaf.relative_dir, PathBuf::from("guides/deep/more"));
        assert!(leaf.path.starts_with(temp.path()));
    }

    #[test]
    fn test_scanner_depth_first_sorted() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("b.mdx").write_str("b").unwrap();
        temp.child("a/z.mdx").write_str("z").unwrap();
        temp.child("a/y.mdx").write_str("y").unwrap();
        temp.child("c/x.mdx").write_str("x").unwrap();

        let config = Config::builder()
            .root_dir(temp.path())
            .output_dir(temp.path().join("dist"))
            .sort_entries(true)
            .build()
            .unwrap();
        let files = Scanner::new(&config).unwrap().scan().unwrap();

        // A directory's whole subtree is emitted before its next sibling.
        assert_eq!(stems(&files), vec!["y", "z", "b", "x"]);
    }

    #[test]
    fn test_scanner_extension_is_case_sensitive() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("upper.MDX").write_str("u").unwrap();
        temp.child("lower.mdx").write_str("l").unwrap();

        let files = Scanner::new(&create_test_config(temp.path()))
            .unwrap()
            .scan()
            .unwrap();

        assert_eq!(stems(&files), vec!["lower"]);
    }

    #[test]
    fn test_scanner_custom_extension() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.rst").write_str("a").unwrap();
        temp.child("b.mdx").write_str("b").unwrap();

        let config = Config::builder()
            .root_dir(temp.path())
            .output_dir(temp.path().join("dist"))
            .source_extension("rst")
            .build()
            .unwrap();
        let files = Scanner::new(&config).unwrap().scan().unwrap();

        assert_eq!(stems(&files), vec!["a"]);
    }

    #[test]
    fn test_scanner_empty_directory() {
        let temp = assert_fs::TempDir::new().unwrap();

        let files = Scanner::new(&create_test_config(temp.path()))
            .unwrap()
            .scan()
            .unwrap();

        assert!(files.is_empty());
    }

    #[test]
    fn test_scanner_missing_root() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = create_test_config(&temp.path().join("does-not-exist"));

        let result = Scanner::new(&config).unwrap().scan();
        assert!(result.unwrap_err().is_io());
    }

    #[test]
    fn test_scanner_exclusions() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("keep.mdx").write_str("k").unwrap();
        temp.child("CHANGELOG.mdx").write_str("c").unwrap();
        temp.child("node_modules/pkg/readme.mdx").write_str("n").unwrap();
        temp.child("guides/node_modules/x.mdx").write_str("n").unwrap();

        let config = Config::builder()
            .root_dir(temp.path())
            .output_dir(temp.path().join("dist"))
            .filter_config(
                FilterConfig::new()
                    .exclude_directories(vec!["**/node_modules".to_string()])
                    .exclude_files(vec!["CHANGELOG.mdx".to_string()]),
            )
            .build()
            .unwrap();

        let (files, stats) = Scanner::new(&config).unwrap().scan_with_stats().unwrap();

        assert_eq!(stems(&files), vec!["keep"]);
        assert_eq!(stats.excluded, 3);
        assert_eq!(stats.matched_files, 1);
    }
}
