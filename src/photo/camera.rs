//! Camera snapshots.

use std::path::PathBuf;

use super::encode_data_url;
use crate::error::PhotoError;

/// A live camera device that can hand back the current frame.
pub trait Camera: Send + Sync {
    /// Take a snapshot of the current frame as a JPEG data URL.
    fn snapshot(&self) -> Result<String, PhotoError>;
}

/// Camera backed by a frame file that a capture daemon keeps overwriting
/// with the latest JPEG frame.
pub struct FrameFileCamera {
    frame: PathBuf,
}

impl FrameFileCamera {
    pub fn new(frame: impl Into<PathBuf>) -> Self {
        Self {
            frame: frame.into(),
        }
    }
}

impl Camera for FrameFileCamera {
    fn snapshot(&self) -> Result<String, PhotoError> {
        let bytes = std::fs::read(&self.frame).map_err(|e| {
            PhotoError::CameraUnavailable(format!("{}: {e}", self.frame.display()))
        })?;
        if bytes.is_empty() {
            return Err(PhotoError::CameraUnavailable(format!(
                "{}: no frame captured yet",
                self.frame.display()
            )));
        }
        Ok(encode_data_url("image/jpeg", &bytes))
    }
}

/// Stand-in when no camera device is configured.
pub struct NoCamera;

impl Camera for NoCamera {
    fn snapshot(&self) -> Result<String, PhotoError> {
        Err(PhotoError::CameraUnavailable("no camera configured".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_file_snapshot_is_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let frame = dir.path().join("frame.jpg");
        std::fs::write(&frame, b"abc").unwrap();

        let camera = FrameFileCamera::new(&frame);
        assert_eq!(camera.snapshot().unwrap(), "data:image/jpeg;base64,YWJj");
    }

    #[test]
    fn missing_frame_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let camera = FrameFileCamera::new(dir.path().join("frame.jpg"));
        assert!(matches!(camera.snapshot(), Err(PhotoError::CameraUnavailable(_))));
    }

    #[test]
    fn no_camera_always_fails() {
        assert!(matches!(NoCamera.snapshot(), Err(PhotoError::CameraUnavailable(_))));
    }
}
