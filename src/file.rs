use crate::error::{Error, Result};
use serde::Serialize;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Separator line opening every provenance block.
pub(crate) const BLOCK_SEPARATOR: &str = "-----------------";

/// Label preceding the original path in a provenance block.
pub(crate) const PATH_LABEL: &str = "FILE PATH:";

/// A discovered source file.
///
/// Content is not held here; it is read on demand by the planner and
/// dropped once appended to a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    /// Path as discovered, without `.` segments (`./docs/a.mdx` becomes
    /// `docs/a.mdx`)
    pub path: PathBuf,

    /// Containing directory relative to the scan root (empty at the root)
    pub relative_dir: PathBuf,

    /// File name without the source extension
    pub stem: String,
}

impl SourceFile {
    /// Creates a source file record.
    ///
    /// `extension` includes the leading dot and is stripped from the file
    /// name to form the stem.
    #[must_use]
    pub fn new(path: PathBuf, root: &Path, extension: &str) -> Self {
        let relative_dir = path
            .parent()
            .and_then(|parent| pathdiff::diff_paths(parent, root))
            .unwrap_or_default();

        let stem = file_stem(&path, extension);

        Self {
            path: strip_cur_dir(&path),
            relative_dir,
            stem,
        }
    }

    /// Reads the whole file as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid UTF-8.
    pub fn read_content(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::InvalidData {
                Error::invalid_utf8(&self.path)
            } else {
                Error::io(&self.path, e)
            }
        })
    }

    /// Reads the file and renders its provenance block.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn render(&self) -> Result<String> {
        let content = self.read_content()?;
        Ok(render_block(&self.path, &content))
    }
}

/// Renders one file's provenance block.
///
/// The layout is fixed: separator line, `FILE PATH:` line, blank line, the
/// raw content, then two newlines. Blocks are concatenated as-is.
#[must_use]
pub fn render_block(path: &Path, content: &str) -> String {
    let path = path.display().to_string();
    let mut block = String::with_capacity(
        BLOCK_SEPARATOR.len() + PATH_LABEL.len() + path.len() + content.len() + 6,
    );

    block.push_str(BLOCK_SEPARATOR);
    block.push('\n');
    block.push_str(PATH_LABEL);
    block.push(' ');
    block.push_str(&path);
    block.push_str("\n\n");
    block.push_str(content);
    block.push_str("\n\n");
    block
}

fn strip_cur_dir(path: &Path) -> PathBuf {
    let stripped: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    if stripped.as_os_str().is_empty() {
        path.to_path_buf()
    } else {
        stripped
    }
}

/// Returns true if the file name of `path` ends in exactly `extension`.
///
/// Matching is case-sensitive. A dotfile named like the extension itself
/// (e.g. `.mdx`) has no extension and does not match.
#[must_use]
pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    let Some(ext) = extension.strip_prefix('.') else {
        return false;
    };

    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == ext)
}

fn file_stem(path: &Path, extension: &str) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    match name.strip_suffix(extension) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_render_block_layout() {
        let block = render_block(Path::new("docs/a.mdx"), "hello");
        assert_eq!(block, "-----------------\nFILE PATH: docs/a.mdx\n\nhello\n\n");
    }

    #[test]
    fn test_render_block_empty_content() {
        let block = render_block(Path::new("x.mdx"), "");
        assert_eq!(block, "-----------------\nFILE PATH: x.mdx\n\n\n\n");
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("docs/intro.mdx"), ".mdx"));
        assert!(has_extension(Path::new("intro.v2.mdx"), ".mdx"));
        assert!(!has_extension(Path::new("intro.MDX"), ".mdx"));
        assert!(!has_extension(Path::new("intro.md"), ".mdx"));
        assert!(!has_extension(Path::new("intro.mdxx"), ".mdx"));
        assert!(!has_extension(Path::new(".mdx"), ".mdx"));
        assert!(!has_extension(Path::new("intro.mdx"), "mdx"));
    }

    #[test]
    fn test_source_file_new() {
        let root = Path::new("docs");
        let file = SourceFile::new(PathBuf::from("docs/guides/setup.mdx"), root, ".mdx");

        assert_eq!(file.stem, "setup");
        assert_eq!(file.relative_dir, PathBuf::from("guides"));
    }

    #[test]
    fn test_source_file_at_root() {
        let root = Path::new("docs");
        let file = SourceFile::new(PathBuf::from("docs/index.mdx"), root, ".mdx");

        assert_eq!(file.stem, "index");
        assert_eq!(file.relative_dir, PathBuf::new());
    }

    #[test]
    fn test_source_file_drops_current_dir_segments() {
        let root = Path::new("./docs");
        let file = SourceFile::new(PathBuf::from("./docs/guides/setup.mdx"), root, ".mdx");

        assert_eq!(file.path, PathBuf::from("docs/guides/setup.mdx"));
        assert_eq!(file.relative_dir, PathBuf::from("guides"));

        let at_root = SourceFile::new(PathBuf::from("./index.mdx"), Path::new("."), ".mdx");
        assert_eq!(at_root.path, PathBuf::from("index.mdx"));
        assert_eq!(at_root.relative_dir, PathBuf::new());
    }

    #[test]
    fn test_stem_keeps_inner_dots() {
        let file = SourceFile::new(PathBuf::from("r/v1.2.notes.mdx"), Path::new("r"), ".mdx");
        assert_eq!(file.stem, "v1.2.notes");
    }

    #[test]
    fn test_render_reads_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let child = temp.child("a.mdx");
        child.write_str("# Title\n\nBody").unwrap();

        let file = SourceFile::new(child.path().to_path_buf(), temp.path(), ".mdx");
        let block = file.render().unwrap();

        assert!(block.starts_with("-----------------\nFILE PATH: "));
        assert!(block.contains(&child.path().display().to_string()));
        assert!(block.ends_with("\n\n# Title\n\nBody\n\n"));
    }

    #[test]
    fn test_read_missing_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = SourceFile::new(temp.path().join("gone.mdx"), temp.path(), ".mdx");

        assert!(file.read_content().unwrap_err().is_io());
    }

    #[test]
    fn test_read_invalid_utf8() {
        let temp = assert_fs::TempDir::new().unwrap();
        let child = temp.child("bad.mdx");
        child.write_binary(&[0xff, 0xfe, 0x00, 0x41]).unwrap();

        let file = SourceFile::new(child.path().to_path_buf(), temp.path(), ".mdx");
        assert!(matches!(file.read_content(), Err(Error::InvalidUtf8 { .. })));
    }
}
