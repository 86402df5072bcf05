use crate::model::PageKey;
use std::io;
use std::path::{Path, PathBuf};

/// On-disk working area holding persisted page images for one publication
///
/// Layout: `{work_dir}/{title}/{volume}/{chapter}_{page}.jpg`. Each key is
/// written exactly once, so concurrent writers never contend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    work_dir: PathBuf,
    root: PathBuf,
}

impl Workspace {
    /// Creates the handle; nothing touches the disk until `prepare`
    pub fn new(work_dir: &Path, title: &str) -> Self {
        Self {
            work_dir: work_dir.to_path_buf(),
            root: work_dir.join(sanitize_title(title)),
        }
    }

    /// Directory holding every image of this publication
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the images of one volume
    pub fn volume_dir(&self, volume: usize) -> PathBuf {
        self.root.join(volume.to_string())
    }

    /// Canonical path of a persisted page image
    pub fn image_path(&self, key: PageKey) -> PathBuf {
        self.volume_dir(key.volume).join(key.file_name())
    }

    /// Creates the publication directory and one directory per volume
    pub fn prepare(&self, volumes: usize) -> io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        for volume in 0..volumes {
            std::fs::create_dir_all(self.volume_dir(volume))?;
        }
        tracing::debug!(
            "Prepared working storage at {} ({} volumes)",
            self.root.display(),
            volumes
        );
        Ok(())
    }

    /// Writes a page image at its canonical path
    ///
    /// Bytes go to a `.part` sibling first and are renamed into place, so
    /// the canonical path only ever holds a complete file.
    pub async fn persist(&self, key: PageKey, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.image_path(key);
        let partial = path.with_extension("jpg.part");

        tokio::fs::write(&partial, bytes).await?;
        if let Err(e) = tokio::fs::rename(&partial, &path).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }

        Ok(path)
    }

    /// Removes the whole working area for this publication
    ///
    /// The work directory itself is removed too when nothing else is left
    /// in it.
    pub fn remove(&self) -> io::Result<()> {
        match std::fs::remove_dir_all(&self.root) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }

        // Fails harmlessly when other publications still live there
        if std::fs::remove_dir(&self.work_dir).is_ok() {
            tracing::debug!("Removed empty work dir {}", self.work_dir.display());
        }

        Ok(())
    }
}

/// Makes a display title safe to use as a single path component
pub fn sanitize_title(title: &str) -> String {
    let cleaned: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let cleaned = cleaned.trim_matches('.').trim().to_string();
    if cleaned.is_empty() {
        "untitled".to_string()
    } else {
        cleaned
    }
}
