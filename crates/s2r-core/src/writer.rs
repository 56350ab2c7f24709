//! Write generated README files to disk.

use crate::descriptor::GeneratedDocument;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Conventional README file name.
pub const DEFAULT_README_NAME: &str = "README.md";

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("target directory {} does not exist or is not a directory", .0.display())]
    MissingDirectory(PathBuf),
    #[error("invalid README file name '{0}': expected a plain file name")]
    InvalidFilename(String),
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Check whether `dir/filename` already exists.
pub fn readme_exists(dir: &Path, filename: &str) -> bool {
    dir.join(filename).exists()
}

/// Validate the write target without touching it.
///
/// Lets callers reject a bad directory or file name before paying for a
/// completion. Returns the path that [`write_readme`] would write.
pub fn check_target(dir: &Path, filename: &str) -> Result<PathBuf, WriteError> {
    if !is_plain_file_name(filename) {
        return Err(WriteError::InvalidFilename(filename.to_string()));
    }
    if !dir.is_dir() {
        return Err(WriteError::MissingDirectory(dir.to_path_buf()));
    }
    Ok(dir.join(filename))
}

/// Write `document` to `dir/filename`, replacing any existing file.
///
/// The text is written byte-for-byte. Returns the path written.
pub fn write_readme(
    document: &GeneratedDocument,
    dir: &Path,
    filename: &str,
) -> Result<PathBuf, WriteError> {
    let path = check_target(dir, filename)?;
    fs::write(&path, document.as_str()).map_err(|source| WriteError::Io {
        path: path.clone(),
        source,
    })?;
    tracing::info!(
        "wrote {} ({} bytes)",
        path.display(),
        document.as_str().len()
    );
    Ok(path)
}

fn is_plain_file_name(filename: &str) -> bool {
    let mut components = Path::new(filename).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_file_names() {
        assert!(is_plain_file_name("README.md"));
        assert!(is_plain_file_name("EXAMPLE_README.md"));
        assert!(!is_plain_file_name(""));
        assert!(!is_plain_file_name("../README.md"));
        assert!(!is_plain_file_name("docs/README.md"));
        assert!(!is_plain_file_name("/README.md"));
        assert!(!is_plain_file_name(".."));
    }
}
