//! Panel images on disk.
//!
//! Each illustrated block is written as `pN_bM.png` in an output directory.
//! Reading the directory back seeds an [`IllustrationCache`], so an
//! interrupted illustration pass resumes without re-rendering finished panels.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};
use ukiyo_core::{BlockAddress, Illustration};
use ukiyo_error::{StorageError, StorageErrorKind, UkiyoResult};
use ukiyo_narrative::IllustrationCache;

/// Directory of panel PNG files.
#[derive(Debug, Clone)]
pub struct PanelDirectory {
    root: PathBuf,
}

impl PanelDirectory {
    /// Panels under `root`. Nothing is created until the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory itself.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the panel for `address` lives.
    pub fn path_for(&self, address: BlockAddress) -> PathBuf {
        self.root.join(format!("{address}.png"))
    }

    /// Decode an illustration and write it as a PNG file.
    #[instrument(skip(self, illustration), fields(address = %illustration.address))]
    pub async fn write(&self, illustration: &Illustration) -> UkiyoResult<PathBuf> {
        let payload = illustration.base64_payload().ok_or_else(|| {
            StorageError::new(StorageErrorKind::InvalidImage(format!(
                "{} is not a base64 PNG data URI",
                illustration.address
            )))
        })?;
        let bytes = STANDARD.decode(payload).map_err(|e| {
            StorageError::new(StorageErrorKind::InvalidImage(format!(
                "{}: {e}",
                illustration.address
            )))
        })?;

        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {e}",
                self.root.display()
            )))
        })?;

        // Write to temp file first, then rename
        let path = self.path_for(illustration.address);
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &bytes).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {e}",
                temp_path.display()
            )))
        })?;
        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {e}",
                temp_path.display(),
                path.display()
            )))
        })?;

        debug!(path = %path.display(), size = bytes.len(), "Panel written");
        Ok(path)
    }

    /// Load existing panels for `addresses` into `cache`. Returns how many were found.
    #[instrument(skip(self, addresses, cache), fields(root = %self.root.display()))]
    pub async fn seed_cache(
        &self,
        addresses: &[BlockAddress],
        cache: &IllustrationCache,
    ) -> UkiyoResult<usize> {
        let mut found = 0;
        for &address in addresses {
            let path = self.path_for(address);
            if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
                continue;
            }
            let bytes = tokio::fs::read(&path).await.map_err(|e| {
                StorageError::new(StorageErrorKind::FileRead(format!("{}: {e}", path.display())))
            })?;
            cache
                .insert(Illustration::from_base64_png(address, &STANDARD.encode(bytes)))
                .await;
            found += 1;
        }
        if found > 0 {
            info!(found, "Reusing panels already on disk");
        }
        Ok(found)
    }
}
