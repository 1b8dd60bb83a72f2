use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

/// Filesystem-backed object storage for uploaded enrollment documents.
///
/// The upload root is served read-only under `/files` (see router wiring in
/// main), so `public_url` values are directly fetchable.
#[derive(Clone)]
pub struct StorageService {
    root: PathBuf,
    public_base: String,
}

impl StorageService {
    pub fn new(root: impl Into<PathBuf>, public_base: &str) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }

    /// Store bytes at a relative path under the upload root.
    pub async fn upload(&self, rel_path: &str, bytes: &[u8]) -> Result<()> {
        if rel_path.contains("..") {
            return Err(AppError::BadRequest("Invalid storage path".to_string()));
        }

        let full_path = self.root.join(rel_path);
        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full_path, bytes).await?;

        tracing::debug!(path = %full_path.display(), size = bytes.len(), "stored document");
        Ok(())
    }

    /// Public URL for a stored relative path.
    pub fn public_url(&self, rel_path: &str) -> String {
        format!("{}/{}", self.public_base, rel_path)
    }

    /// Storage path for an enrollment document: a fresh UUID under the
    /// enrollment's directory, keeping the original file extension.
    pub fn document_path(&self, enrollment_id: i64, original_filename: &str) -> String {
        let ext = Path::new(original_filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        format!("enrollment/{}/{}.{}", enrollment_id, uuid::Uuid::new_v4(), ext)
    }
}
