//! Loads image files from disk for image search.

use std::path::Path;

use fyndd_core::search::ImageBlob;
use fyndd_core::{FynddError, Result};

/// Reads `path` into an [`ImageBlob`], inferring the MIME type from the
/// extension.
///
/// Files larger than `max_bytes` are rejected from their metadata without
/// being read. The MIME check itself happens in [`ImageBlob::validate`].
pub async fn load_image(path: &Path, max_bytes: usize) -> Result<ImageBlob> {
    let metadata = tokio::fs::metadata(path).await.map_err(|e| {
        FynddError::InvalidImage(format!("Cannot read {}: {}", path.display(), e))
    })?;
    if metadata.len() > max_bytes as u64 {
        return Err(FynddError::InvalidImage(format!(
            "Image is larger than {} MB.",
            max_bytes / (1024 * 1024)
        )));
    }

    let bytes = tokio::fs::read(path).await?;
    let mime_type = mime_guess::from_path(path).first_or_octet_stream();
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    Ok(ImageBlob::new(bytes, mime_type.essence_str(), file_name))
}
