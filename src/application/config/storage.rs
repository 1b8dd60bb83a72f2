use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory for uploaded enrollment documents.
    pub upload_dir: PathBuf,
    /// Base URL under which the upload root is served (see `/files` in main).
    pub public_base_url: String,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self {
            upload_dir: env::var("REGISTRAR_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/var/lib/registrar/documents")),
            public_base_url: env::var("REGISTRAR_PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000/files".to_string()),
        }
    }
}
