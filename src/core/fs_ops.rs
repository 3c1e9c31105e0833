// src/core/fs_ops.rs
//! File system helpers and the scoped export artifact

use anyhow::{Context, Result};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct FsOps;

impl FsOps {
    pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)
                .await
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            info!("Created directory: {}", path.display());
        }
        Ok(())
    }

    /// Write bytes, creating the parent directory first
    pub async fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            Self::ensure_dir_exists(parent).await?;
        }
        fs::write(path, bytes)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        info!("Written file: {}", path.display());
        Ok(())
    }
}

/// A file that lives exactly as long as this value.
///
/// Each artifact gets its own directory, so concurrent exports that share a
/// file name never touch each other. Dropping the guard removes the directory.
#[derive(Debug)]
pub struct TempArtifact {
    dir: PathBuf,
    path: PathBuf,
}

impl TempArtifact {
    pub async fn write(parent: &Path, file_name: &str, bytes: &[u8]) -> io::Result<Self> {
        let dir = parent.join(format!("export-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).await?;

        let artifact = Self {
            path: dir.join(file_name),
            dir,
        };
        fs::write(&artifact.path, bytes).await?;
        debug!("Wrote artifact {}", artifact.path.display());
        Ok(artifact)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        match std::fs::remove_dir_all(&self.dir) {
            Ok(()) => debug!("Removed artifact {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove {}: {}", self.dir.display(), e),
        }
    }
}
