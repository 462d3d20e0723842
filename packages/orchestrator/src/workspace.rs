use std::io;
use std::path::{Path, PathBuf};

use crate::error::{OrchestratorError, Result};

/// Removes `path` whether it is a directory, a file or a (possibly dangling)
/// symlink. A symlink is removed itself, never followed.
fn remove_any(path: &Path) -> io::Result<()> {
    let meta = std::fs::symlink_metadata(path)?;
    if meta.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    }
}

/// Best-effort removal of stale outputs.
///
/// Failures are logged at debug level and otherwise ignored; an already
/// absent path is the desired end state. Returns the paths that existed and
/// were removed.
pub fn clean(root: &Path, paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut removed = Vec::new();
    for rel in paths {
        let path = root.join(rel);
        match remove_any(&path) {
            Ok(()) => removed.push(rel.clone()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::debug!(path = %path.display(), error = %e, "cleanup failed"),
        }
    }
    removed
}

/// Points `root/link` at `target`, stored exactly as given.
///
/// The target is not required to exist. Returns whether it did at link time,
/// resolved relative to the link's directory like the OS will resolve it.
pub fn link_result(root: &Path, link: &Path, target: &Path) -> Result<bool> {
    let link_path = root.join(link);

    // A leftover link from an interrupted run would make symlink() fail.
    if std::fs::symlink_metadata(&link_path).is_ok() {
        remove_any(&link_path)?;
    }

    symlink(target, &link_path).map_err(|source| OrchestratorError::Link {
        link: link.to_path_buf(),
        target: target.to_path_buf(),
        source,
    })?;

    Ok(link_path.exists())
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}
