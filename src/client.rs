//! Submission client — posts the finished record to the backend.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::WizardConfig;
use crate::error::SubmissionError;
use crate::registration::RegistrationRecord;

/// The user identity returned by a successful registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredUser {
    /// Opaque `user` payload from the backend.
    pub user: serde_json::Value,
    pub registered_at: DateTime<Utc>,
}

impl RegisteredUser {
    pub fn new(user: serde_json::Value) -> Self {
        Self {
            user,
            registered_at: Utc::now(),
        }
    }

    /// Best-effort display name: `username`, then `email`, from the payload.
    pub fn display_name(&self) -> Option<&str> {
        ["username", "email"]
            .iter()
            .find_map(|key| self.user.get(key).and_then(|v| v.as_str()))
    }
}

/// Anything that can register a user from a completed record.
#[async_trait]
pub trait SubmissionClient: Send + Sync {
    async fn register(&self, record: &RegistrationRecord)
    -> Result<RegisteredUser, SubmissionError>;
}

/// Pull `user` out of a 2xx body. The account exists by then, so a body
/// without one (or one that isn't JSON) still counts as registered.
fn user_from_body(body: &str) -> serde_json::Value {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(mut map)) => map.remove("user").unwrap_or_else(|| {
            warn!("Registration response has no `user`");
            serde_json::Value::Null
        }),
        Ok(_) => {
            warn!("Registration response is not a JSON object");
            serde_json::Value::Null
        }
        Err(e) => {
            warn!(error = %e, "Registration response is not JSON");
            serde_json::Value::Null
        }
    }
}

/// `reqwest`-backed client for `POST /register`.
pub struct HttpSubmissionClient {
    client: reqwest::Client,
    url: String,
}

impl HttpSubmissionClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SubmissionError> {
        let url = url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SubmissionError::RequestFailed {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self { client, url })
    }

    pub fn from_config(config: &WizardConfig) -> Result<Self, SubmissionError> {
        Self::new(config.register_url(), config.request_timeout)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SubmissionClient for HttpSubmissionClient {
    async fn register(
        &self,
        record: &RegistrationRecord,
    ) -> Result<RegisteredUser, SubmissionError> {
        debug!(url = %self.url, username = %record.username, "Posting registration");

        let resp = self
            .client
            .post(&self.url)
            .json(record)
            .send()
            .await
            .map_err(|e| SubmissionError::RequestFailed {
                url: self.url.clone(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SubmissionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read registration response body");
            String::new()
        });

        info!(username = %record.username, status = status.as_u16(), "Registration accepted");
        Ok(RegisteredUser::new(user_from_body(&body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_username() {
        let user = RegisteredUser::new(serde_json::json!({"username": "ada", "email": "a@b.c"}));
        assert_eq!(user.display_name(), Some("ada"));

        let user = RegisteredUser::new(serde_json::json!({"email": "a@b.c"}));
        assert_eq!(user.display_name(), Some("a@b.c"));

        let user = RegisteredUser::new(serde_json::json!({"id": 7}));
        assert_eq!(user.display_name(), None);
    }

    #[test]
    fn user_is_taken_from_body() {
        let user = user_from_body(r#"{"user": {"username": "ada"}, "token": "t"}"#);
        assert_eq!(user, serde_json::json!({"username": "ada"}));
    }

    #[test]
    fn body_without_user_yields_null() {
        assert!(user_from_body(r#"{"message": "ok"}"#).is_null());
        assert!(user_from_body("Created").is_null());
        assert!(user_from_body("").is_null());
        assert!(user_from_body("[1, 2]").is_null());
    }

    #[test]
    fn client_targets_register_endpoint() {
        let config = WizardConfig::default();
        let client = HttpSubmissionClient::from_config(&config).unwrap();
        assert_eq!(client.url(), "http://localhost:5000/register");
    }
}
