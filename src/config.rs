//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Backend used when `REGISTER_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Wizard configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct WizardConfig {
    /// Base URL of the backend; `/register` is appended on submit.
    pub api_url: String,
    /// Per-request timeout for the registration POST.
    pub request_timeout: Duration,
    /// Frame file written by the camera device, if one is attached.
    pub camera_frame: Option<PathBuf>,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            camera_frame: None,
        }
    }
}

impl WizardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("REGISTER_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();
        if api_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "REGISTER_API_URL".into(),
                message: "must not be empty".into(),
            });
        }

        let timeout_secs: u64 = lookup("REGISTER_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(30);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "REGISTER_TIMEOUT_SECS".into(),
                message: "must be at least 1 second".into(),
            });
        }

        let camera_frame = lookup("REGISTER_CAMERA_FRAME")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            api_url,
            request_timeout: Duration::from_secs(timeout_secs),
            camera_frame,
        })
    }

    /// Full URL of the registration endpoint.
    pub fn register_url(&self) -> String {
        format!("{}/register", self.api_url)
    }
}
