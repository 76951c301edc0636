use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::errors::ClientError;
use crate::models::resume::DownloadFormat;

pub fn default_file_name(resume_id: i64, format: DownloadFormat) -> String {
    format!("resume_{resume_id}.{}", format.as_str())
}

/// Where an artifact lands: inside `destination` when it is an existing
/// directory or ends with a path separator, otherwise at `destination` itself.
/// Missing directories are created by `save_artifact`.
pub fn resolve_target(destination: &Path, resume_id: i64, format: DownloadFormat) -> PathBuf {
    if destination.is_dir() || names_directory(destination) {
        destination.join(default_file_name(resume_id, format))
    } else {
        destination.to_path_buf()
    }
}

fn names_directory(path: &Path) -> bool {
    path.as_os_str()
        .to_string_lossy()
        .ends_with(std::path::is_separator)
}

/// Writes the artifact through a transient file next to the target, then
/// moves it into place. The transient file is removed on every failure path.
pub fn save_artifact(bytes: &[u8], target: &Path) -> Result<PathBuf, ClientError> {
    let parent = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut transient = NamedTempFile::new_in(parent)?;
    transient.write_all(bytes)?;
    transient.flush()?;
    transient.persist(target).map_err(|e| ClientError::Io(e.error))?;

    Ok(target.to_path_buf())
}
