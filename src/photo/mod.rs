//! Photo capture — file upload or camera snapshot, both yielding data URLs.

pub mod camera;
pub mod file;

pub use camera::{Camera, FrameFileCamera, NoCamera};
pub use file::read_data_url;

use base64::{Engine, engine::general_purpose::STANDARD};

/// Which photo input the first page is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhotoMode {
    #[default]
    FileUpload,
    Camera,
}

/// Encode raw image bytes as a `data:` URL.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}
