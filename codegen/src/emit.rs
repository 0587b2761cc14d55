//! Writing rendered files to the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::GenerateError;

/// A fully rendered output file, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// File name relative to the output directory.
    pub file_name: String,
    /// File content.
    pub content: String,
}

impl RenderedFile {
    /// Pairs a file name with its content.
    #[must_use]
    pub fn new(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }
}

/// Writes `files` under `out_dir`, creating it as needed, and returns the
/// written paths in order.
///
/// Either every file is written or none is left behind: when a write fails,
/// the files this call already wrote are removed before the error returns.
///
/// # Errors
///
/// Returns [`GenerateError::CreateDir`] or [`GenerateError::Write`].
pub fn write_all(out_dir: &Path, files: &[RenderedFile]) -> Result<Vec<PathBuf>, GenerateError> {
    fs::create_dir_all(out_dir).map_err(|source| GenerateError::CreateDir {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = out_dir.join(&file.file_name);
        if let Err(source) = fs::write(&path, &file.content) {
            written.push(path.clone());
            remove_all(&written);
            return Err(GenerateError::Write { path, source });
        }
        tracing::debug!(path = %path.display(), bytes = file.content.len(), "wrote file");
        written.push(path);
    }
    Ok(written)
}

fn remove_all(paths: &[PathBuf]) {
    for path in paths.iter().filter(|path| path.is_file()) {
        if let Err(err) = fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %err, "cannot remove partial output");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("out");
        let files = [RenderedFile::new("a.proto", "a"), RenderedFile::new("b.proto", "b")];
        let written = write_all(&out, &files).unwrap();
        assert_eq!(written, vec![out.join("a.proto"), out.join("b.proto")]);
        assert_eq!(fs::read_to_string(out.join("b.proto")).unwrap(), "b");
    }

    #[test]
    fn failed_write_leaves_no_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where a file should go makes the second write fail.
        fs::create_dir(dir.path().join("b.proto")).unwrap();
        let files = [RenderedFile::new("a.proto", "a"), RenderedFile::new("b.proto", "b")];
        let err = write_all(dir.path(), &files).unwrap_err();
        assert!(matches!(err, GenerateError::Write { ref path, .. } if path.ends_with("b.proto")));
        assert!(!dir.path().join("a.proto").exists());
        assert!(dir.path().join("b.proto").is_dir());
    }
}
