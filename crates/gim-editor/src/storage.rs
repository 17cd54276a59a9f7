//! Loading and saving buffers as lists of lines.
//!
//! The session only sees the [`Storage`] trait. [`FsStorage`] is the real
//! filesystem; [`MemoryStorage`] keeps files in a map and can be told to
//! fail writes.
//!
//! The layout of a loaded file is remembered per path as a [`FileFormat`]:
//! its line ending (first one wins) and whether the last line was
//! terminated. A CRLF file is written back as CRLF, and a file without a
//! final newline (an empty file included) does not gain one. Files that
//! were never loaded get LF after every line.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StorageError {
    /// The file does not exist. Not a failure for loading: it is a new file.
    #[error("file not found")]
    NotFound,
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl StorageError {
    /// Map `io::ErrorKind::NotFound` to [`StorageError::NotFound`].
    #[must_use]
    pub fn from_io(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Self::NotFound
        } else {
            Self::Io(err)
        }
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Where buffers come from and go to.
pub trait Storage {
    /// Read `path` as lines without their endings.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`] if the file does not exist, `Io` for any
    /// other read failure (permissions, invalid UTF-8, ...).
    fn load_lines(&mut self, path: &Path) -> Result<Vec<String>, StorageError>;

    /// Replace the contents of `path` with `lines`.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be written.
    fn save_lines(&mut self, path: &Path, lines: &[String]) -> Result<(), StorageError>;
}

// ---------------------------------------------------------------------------
// LineEnding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
    Cr,
}

impl LineEnding {
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Cr => "\r",
        }
    }

    /// The first line ending in `text`, `Lf` if there is none.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        let bytes = text.as_bytes();
        for (i, &b) in bytes.iter().enumerate() {
            match b {
                b'\n' => return Self::Lf,
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => return Self::CrLf,
                b'\r' => return Self::Cr,
                _ => {}
            }
        }
        Self::Lf
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lf => "LF",
            Self::CrLf => "CRLF",
            Self::Cr => "CR",
        })
    }
}

/// How a file lays out its lines on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileFormat {
    pub ending: LineEnding,
    /// Whether the last line is followed by an ending.
    pub final_newline: bool,
}

impl Default for FileFormat {
    fn default() -> Self {
        Self {
            ending: LineEnding::Lf,
            final_newline: true,
        }
    }
}

impl FileFormat {
    /// Format of `text` as read from disk.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        Self {
            ending: LineEnding::detect(text),
            final_newline: text.ends_with(['\n', '\r']),
        }
    }
}

/// Split `text` on `\n`, `\r\n` or lone `\r`. A trailing ending does not
/// produce a final empty line, so `""` and `"\n"` give `[]` and `[""]`.
#[must_use]
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines.push(std::mem::take(&mut current));
            }
            '\n' => lines.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Lines separated by the format's ending, plus one after the last line
/// if the format has a final newline.
#[must_use]
pub fn join_lines(lines: &[String], format: FileFormat) -> String {
    let sep = format.ending.as_str();
    let mut out = String::with_capacity(lines.iter().map(|l| l.len() + sep.len()).sum());
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        out.push_str(line);
    }
    if format.final_newline && !lines.is_empty() {
        out.push_str(sep);
    }
    out
}

// ---------------------------------------------------------------------------
// FsStorage
// ---------------------------------------------------------------------------

/// The local filesystem.
#[derive(Debug, Default)]
pub struct FsStorage {
    formats: HashMap<PathBuf, FileFormat>,
}

impl FsStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The format that will be used when saving `path`.
    #[must_use]
    pub fn format(&self, path: &Path) -> FileFormat {
        self.formats.get(path).copied().unwrap_or_default()
    }
}

impl Storage for FsStorage {
    fn load_lines(&mut self, path: &Path) -> Result<Vec<String>, StorageError> {
        let text = fs::read_to_string(path).map_err(StorageError::from_io)?;
        let format = FileFormat::detect(&text);
        tracing::debug!(
            path = %path.display(),
            ending = %format.ending,
            final_newline = format.final_newline,
            bytes = text.len(),
            "loaded file"
        );
        self.formats.insert(path.to_path_buf(), format);
        Ok(split_lines(&text))
    }

    fn save_lines(&mut self, path: &Path, lines: &[String]) -> Result<(), StorageError> {
        let format = self.format(path);
        let content = join_lines(lines, format);
        fs::write(path, &content)?;
        tracing::debug!(path = %path.display(), ending = %format.ending, bytes = content.len(), "wrote file");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

/// Files held in memory. Useful for driving a session without touching disk.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: HashMap<PathBuf, Vec<String>>,
    fail_writes: bool,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate `path`.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, lines: &[&str]) -> Self {
        self.files
            .insert(path.into(), lines.iter().map(ToString::to_string).collect());
        self
    }

    /// Make every save fail with `PermissionDenied`.
    pub const fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    #[must_use]
    pub fn file(&self, path: &Path) -> Option<&[String]> {
        self.files.get(path).map(Vec::as_slice)
    }
}

impl Storage for MemoryStorage {
    fn load_lines(&mut self, path: &Path) -> Result<Vec<String>, StorageError> {
        self.files.get(path).cloned().ok_or(StorageError::NotFound)
    }

    fn save_lines(&mut self, path: &Path, lines: &[String]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied").into());
        }
        self.files.insert(path.to_path_buf(), lines.to_vec());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn owned(lines: &[&str]) -> Vec<String> {
        lines.iter().map(ToString::to_string).collect()
    }

    // -- Splitting / joining ------------------------------------------------

    #[test]
    fn split_handles_all_endings() {
        assert_eq!(split_lines("a\nb\r\nc\rd"), owned(&["a", "b", "c", "d"]));
    }

    #[test]
    fn split_drops_trailing_empty_segment() {
        assert_eq!(split_lines(""), Vec::<String>::new());
        assert_eq!(split_lines("\n"), owned(&[""]));
        assert_eq!(split_lines("a\n"), owned(&["a"]));
        assert_eq!(split_lines("a\n\n"), owned(&["a", ""]));
        assert_eq!(split_lines("a"), owned(&["a"]));
    }

    #[test]
    fn join_follows_format() {
        let crlf_open = FileFormat {
            ending: LineEnding::CrLf,
            final_newline: false,
        };
        assert_eq!(join_lines(&owned(&["a", "b"]), FileFormat::default()), "a\nb\n");
        assert_eq!(join_lines(&owned(&["a", "b"]), crlf_open), "a\r\nb");
        assert_eq!(join_lines(&owned(&[""]), crlf_open), "");
        assert_eq!(join_lines(&[], FileFormat::default()), "");
    }

    #[test]
    fn detect_final_newline() {
        assert!(FileFormat::detect("a\n").final_newline);
        assert!(FileFormat::detect("a\r\n").final_newline);
        assert!(!FileFormat::detect("a\nb").final_newline);
        assert!(!FileFormat::detect("").final_newline);
    }

    #[test]
    fn detect_first_ending() {
        assert_eq!(LineEnding::detect("a\r\nb\n"), LineEnding::CrLf);
        assert_eq!(LineEnding::detect("a\rb"), LineEnding::Cr);
        assert_eq!(LineEnding::detect("a\nb\r\n"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("none"), LineEnding::Lf);
        assert_eq!(LineEnding::CrLf.to_string(), "CRLF");
    }

    // -- FsStorage ----------------------------------------------------------

    #[test]
    fn fs_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FsStorage::new();
        let err = store.load_lines(&dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[test]
    fn fs_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FsStorage::new();
        let err = store.load_lines(dir.path()).unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }

    #[test]
    fn fs_round_trip_keeps_crlf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dos.txt");
        std::fs::write(&path, "one\r\ntwo\r\n").unwrap();

        let mut store = FsStorage::new();
        let mut lines = store.load_lines(&path).unwrap();
        assert_eq!(lines, owned(&["one", "two"]));
        assert_eq!(store.format(&path).ending, LineEnding::CrLf);

        lines.push("three".into());
        store.save_lines(&path, &lines).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\r\ntwo\r\nthree\r\n");
    }

    #[test]
    fn fs_new_file_is_written_with_lf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.txt");
        let mut store = FsStorage::new();
        store.save_lines(&path, &owned(&["hello", ""])).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n\n");
    }

    #[test]
    fn fs_missing_final_newline_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("open.txt");
        std::fs::write(&path, "one\ntwo").unwrap();

        let mut store = FsStorage::new();
        let lines = store.load_lines(&path).unwrap();
        store.save_lines(&path, &lines).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo");
    }

    #[test]
    fn fs_empty_file_stays_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "").unwrap();

        let mut store = FsStorage::new();
        assert_eq!(store.load_lines(&path).unwrap(), Vec::<String>::new());
        store.save_lines(&path, &owned(&[""])).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn fs_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/file.txt");
        let mut store = FsStorage::new();
        let err = store.save_lines(&path, &owned(&["x"])).unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }

    // -- MemoryStorage ------------------------------------------------------

    #[test]
    fn memory_load_save() {
        let mut mem = MemoryStorage::new().with_file("a.txt", &["x", "y"]);
        assert_eq!(mem.load_lines(Path::new("a.txt")).unwrap(), owned(&["x", "y"]));
        assert!(matches!(
            mem.load_lines(Path::new("b.txt")),
            Err(StorageError::NotFound)
        ));
        mem.save_lines(Path::new("b.txt"), &owned(&["z"])).unwrap();
        assert_eq!(mem.file(Path::new("b.txt")), Some(&owned(&["z"])[..]));
    }

    #[test]
    fn memory_failing_writes() {
        let mut mem = MemoryStorage::new();
        mem.set_fail_writes(true);
        let err = mem.save_lines(Path::new("a"), &[]).unwrap_err();
        assert_eq!(err.to_string(), "permission denied");
        assert!(mem.file(Path::new("a")).is_none());
    }
}
