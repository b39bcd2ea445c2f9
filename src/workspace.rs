//! Scoped temporary workspaces for the two extraction stages.
//!
//! A [`Workspace`] is an exclusively-owned scratch directory tied to one
//! pipeline run. The backing directory is allocated by the OS under the
//! system temp dir with an unpredictable suffix, so concurrent runs on the
//! same host cannot collide. Dropping a workspace removes the directory,
//! which covers every exit path; [`Workspace::release`] is the explicit
//! hand-off point on the normal path.

use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};
use tempfile::{Builder, TempDir};

/// An exclusively-owned scratch directory, recursively removed on release.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
    label: &'static str,
}

impl Workspace {
    /// Create a fresh, empty workspace under the system temp directory.
    ///
    /// `prefix` becomes part of the directory name and identifies the
    /// owning stage in the log.
    pub fn acquire(prefix: &'static str) -> Result<Self> {
        let dir = Builder::new()
            .prefix(prefix)
            .tempdir()
            .with_context(|| format!("failed to create {} workspace", prefix))?;

        info!("Acquired workspace {}", dir.path().display());
        Ok(Workspace { dir, label: prefix })
    }

    /// Filesystem location of this workspace.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Recursively delete the workspace once its output has been consumed.
    ///
    /// Errors here are worth surfacing (a stage may be holding a file
    /// open), but the `Drop` impl still guarantees best-possible cleanup
    /// on paths that never reach this call.
    pub fn release(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        debug!("Releasing {} workspace at {}", self.label, path.display());
        self.dir
            .close()
            .with_context(|| format!("failed to remove workspace {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_acquire_creates_empty_directory() {
        let ws = Workspace::acquire("supertimeline-test-").unwrap();
        assert!(ws.path().is_dir());
        assert_eq!(fs::read_dir(ws.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_release_removes_directory() {
        let ws = Workspace::acquire("supertimeline-test-").unwrap();
        let path = ws.path().to_path_buf();
        fs::write(path.join("intermediate.plaso"), b"store").unwrap();

        ws.release().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_drop_removes_directory() {
        let path = {
            let ws = Workspace::acquire("supertimeline-test-").unwrap();
            ws.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_workspaces_do_not_collide() {
        let a = Workspace::acquire("supertimeline-test-").unwrap();
        let b = Workspace::acquire("supertimeline-test-").unwrap();
        assert_ne!(a.path(), b.path());
    }
}
