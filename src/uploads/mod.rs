use std::path::{Path, PathBuf};

use axum::body::Bytes;
use tracing::info;

use crate::config::UploadConfig;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Unsupported content type: {0}")]
    UnsupportedType(String),
    #[error("File too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A file part pulled out of a multipart body
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Writes recipe photos to the uploads directory
#[derive(Debug, Clone)]
pub struct PhotoStore {
    directory: PathBuf,
    public_path: String,
    max_size: usize,
    allowed_types: Vec<String>,
}

impl PhotoStore {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            directory: config.directory.clone(),
            public_path: config.public_path.trim_end_matches('/').to_string(),
            max_size: config.max_file_size_bytes,
            allowed_types: config.allowed_types.clone(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn validate(&self, file: &UploadedFile) -> Result<(), UploadError> {
        let content_type = file.content_type.to_ascii_lowercase();
        if !self.allowed_types.iter().any(|t| *t == content_type) {
            return Err(UploadError::UnsupportedType(file.content_type.clone()));
        }
        if file.bytes.len() > self.max_size {
            return Err(UploadError::TooLarge {
                size: file.bytes.len(),
                max: self.max_size,
            });
        }
        Ok(())
    }

    /// Validate and persist a photo, returning the public path to embed in the recipe
    pub async fn save(&self, file: &UploadedFile) -> Result<String, UploadError> {
        self.validate(file)?;

        let stored_name = format!("{}_{}", uuid::Uuid::new_v4().simple(), sanitize_file_name(&file.file_name));
        tokio::fs::create_dir_all(&self.directory).await?;
        tokio::fs::write(self.directory.join(&stored_name), &file.bytes).await?;

        info!("Stored photo {} ({} bytes)", stored_name, file.bytes.len());
        Ok(format!("{}/{}", self.public_path, stored_name))
    }
}

/// Keep only the final path component of a client-supplied name
fn sanitize_file_name(name: &str) -> String {
    let base = Path::new(name.rsplit(['/', '\\']).next().unwrap_or(name))
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    if base.is_empty() || base == "." || base == ".." {
        "photo".to_string()
    } else {
        base.to_string()
    }
}
