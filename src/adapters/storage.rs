use crate::core::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Writes artifacts under a base directory on the local file system.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// 建立輸出目錄；失敗時整次執行無法繼續
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}
