//! File upload: read an image from disk as a data URL.

use std::path::Path;

use tracing::debug;

use super::encode_data_url;
use crate::error::PhotoError;

/// Guess the MIME type from the file extension.
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Read `path` asynchronously and encode it as a data URL.
pub async fn read_data_url(path: &Path) -> Result<String, PhotoError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| PhotoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if bytes.is_empty() {
        return Err(PhotoError::Empty(path.to_path_buf()));
    }
    debug!(path = %path.display(), size = bytes.len(), "Read photo file");
    Ok(encode_data_url(mime_for(path), &bytes))
}
