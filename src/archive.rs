//! Evidence bundle preparation: archive decompression or directory
//! passthrough.
//!
//! A directory source is used directly as evidence input; an archive
//! source is decompressed entry by entry into a freshly acquired
//! workspace, decrypting protected entries when a passphrase was
//! supplied. Every failure sub-cause (corrupt archive, wrong passphrase,
//! I/O) collapses into the single archive-extraction error class.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{debug, info, warn};
use zip::ZipArchive;

use crate::config::SourcePath;
use crate::constants::EVIDENCE_WORKSPACE_PREFIX;
use crate::errors::PipelineError;
use crate::workspace::Workspace;

/// Evidence input handed to the extraction stage: either the user's
/// directory as-is, or a workspace holding the decompressed archive.
#[derive(Debug)]
pub enum EvidenceInput {
    /// The source directory, used in place (never deleted)
    Directory(PathBuf),
    /// Workspace owning the decompressed archive contents
    Extracted(Workspace),
}

impl EvidenceInput {
    pub fn path(&self) -> &Path {
        match self {
            EvidenceInput::Directory(path) => path,
            EvidenceInput::Extracted(workspace) => workspace.path(),
        }
    }

    /// Hand back the evidence once the extraction stage has consumed it.
    /// Only an extracted workspace is removed; a directory source belongs
    /// to the user.
    pub fn release(self) -> Result<()> {
        match self {
            EvidenceInput::Directory(_) => Ok(()),
            EvidenceInput::Extracted(workspace) => workspace.release(),
        }
    }
}

/// Prepare the evidence input for the extraction stage.
pub fn prepare_evidence(
    source: &SourcePath,
    passphrase: Option<&str>,
) -> Result<EvidenceInput> {
    match source {
        SourcePath::Directory(path) => {
            info!("Using evidence directory {} in place", path.display());
            Ok(EvidenceInput::Directory(path.clone()))
        }
        SourcePath::Archive(path) => {
            let workspace = Workspace::acquire(EVIDENCE_WORKSPACE_PREFIX)?;
            extract_archive(path, passphrase, workspace.path())?;
            Ok(EvidenceInput::Extracted(workspace))
        }
    }
}

/// Decompress every archive entry into `dest`, decrypting with
/// `passphrase` when one was supplied.
pub fn extract_archive(
    archive_path: &Path,
    passphrase: Option<&str>,
    dest: &Path,
) -> Result<(), PipelineError> {
    info!("Extracting {} into {}", archive_path.display(), dest.display());

    let file = fs::File::open(archive_path).map_err(|e| {
        PipelineError::ArchiveExtraction(format!(
            "cannot open {}: {}",
            archive_path.display(),
            e
        ))
    })?;
    let mut archive = ZipArchive::new(file).map_err(|e| {
        PipelineError::ArchiveExtraction(format!(
            "cannot read {}: {}",
            archive_path.display(),
            e
        ))
    })?;

    for index in 0..archive.len() {
        let mut entry = match passphrase {
            Some(password) => archive
                .by_index_decrypt(index, password.as_bytes())
                .map_err(|e| {
                    PipelineError::ArchiveExtraction(format!("entry {}: {}", index, e))
                })?
                .map_err(|_| {
                    PipelineError::ArchiveExtraction(format!(
                        "entry {}: invalid passphrase",
                        index
                    ))
                })?,
            None => archive.by_index(index).map_err(|e| {
                PipelineError::ArchiveExtraction(format!("entry {}: {}", index, e))
            })?,
        };

        // Entries with traversal components are dropped rather than
        // written outside the workspace.
        let relative = match entry.enclosed_name() {
            Some(name) => name.to_path_buf(),
            None => {
                warn!("Skipping archive entry with unsafe name: {}", entry.name());
                continue;
            }
        };
        let target = dest.join(&relative);

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|e| {
                PipelineError::ArchiveExtraction(format!(
                    "cannot create {}: {}",
                    target.display(),
                    e
                ))
            })?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                PipelineError::ArchiveExtraction(format!(
                    "cannot create {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let mut output = fs::File::create(&target).map_err(|e| {
            PipelineError::ArchiveExtraction(format!(
                "cannot create {}: {}",
                target.display(),
                e
            ))
        })?;
        io::copy(&mut entry, &mut output).map_err(|e| {
            PipelineError::ArchiveExtraction(format!(
                "cannot write {}: {}",
                target.display(),
                e
            ))
        })?;
        debug!("Extracted {}", relative.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn write_test_archive(path: &Path) {
        let file = fs::File::create(path).unwrap();
        let mut writer = ZipWriter::new(file);

        writer
            .add_directory("logs/", FileOptions::default())
            .unwrap();
        writer
            .start_file("logs/system.evtx", FileOptions::default())
            .unwrap();
        writer.write_all(b"event records").unwrap();
        writer
            .start_file("registry.hiv", FileOptions::default())
            .unwrap();
        writer.write_all(b"hive data").unwrap();
        writer.finish().unwrap();
    }

    #[test]
    fn test_extract_archive_plain() {
        let dir = TempDir::new().unwrap();
        let archive_path = dir.path().join("evidence.zip");
        write_test_archive(&archive_path);

        let dest = TempDir::new().unwrap();
        extract_archive(&archive_path, None, dest.path()).unwrap();

        assert_eq!(
            fs::read(dest.path().join("logs/system.evtx")).unwrap(),
            b"event records"
        );
        assert_eq!(
            fs::read(dest.path().join("registry.hiv")).unwrap(),
            b"hive data"
        );
    }

    #[test]
    fn test_extract_archive_discards_passphrase_for_unprotected_entries() {
        let dir = TempDir::new().unwrap();
        let archive_path = dir.path().join("evidence.zip");
        write_test_archive(&archive_path);

        let dest = TempDir::new().unwrap();
        extract_archive(&archive_path, Some("infected"), dest.path()).unwrap();
        assert!(dest.path().join("registry.hiv").is_file());
    }

    #[test]
    fn test_extract_archive_corrupt_is_single_error_class() {
        let dir = TempDir::new().unwrap();
        let archive_path = dir.path().join("broken.zip");
        fs::write(&archive_path, b"this is not a zip archive").unwrap();

        let dest = TempDir::new().unwrap();
        let err = extract_archive(&archive_path, None, dest.path()).unwrap_err();
        assert_eq!(err.exit_code(), 7);
    }

    #[test]
    fn test_extract_archive_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = extract_archive(&dir.path().join("gone.zip"), None, dir.path()).unwrap_err();
        assert_eq!(err.exit_code(), 7);
    }

    #[test]
    fn test_prepare_evidence_directory_passthrough() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("artifact.log"), b"entries").unwrap();

        let source = SourcePath::Directory(dir.path().to_path_buf());
        let evidence = prepare_evidence(&source, None).unwrap();

        // Passthrough: the directory itself, no copy
        assert_eq!(evidence.path(), dir.path());
        evidence.release().unwrap();
        assert!(dir.path().join("artifact.log").exists());
    }

    #[test]
    fn test_prepare_evidence_archive_extracts_into_workspace() {
        let dir = TempDir::new().unwrap();
        let archive_path = dir.path().join("evidence.zip");
        write_test_archive(&archive_path);

        let source = SourcePath::Archive(archive_path);
        let evidence = prepare_evidence(&source, None).unwrap();
        let evidence_dir = evidence.path().to_path_buf();

        assert!(evidence_dir.join("logs/system.evtx").is_file());

        evidence.release().unwrap();
        assert!(!evidence_dir.exists());
    }
}
