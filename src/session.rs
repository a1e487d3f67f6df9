//! Session context and navigation — the wizard's outward-facing side effects.

use std::sync::{Arc, RwLock};

use tracing::info;

use crate::client::RegisteredUser;

/// Receives the logged-in user after registration succeeds.
pub trait SessionContext: Send + Sync {
    fn set_current_user(&self, user: RegisteredUser);
}

/// In-memory session holding the current user.
#[derive(Default, Clone)]
pub struct SessionStore {
    current: Arc<RwLock<Option<RegisteredUser>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_user(&self) -> Option<RegisteredUser> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl SessionContext for SessionStore {
    fn set_current_user(&self, user: RegisteredUser) {
        info!(user = ?user.display_name(), "Session user set");
        *self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(user);
    }
}

/// Views the wizard can send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Home => "/home",
        }
    }
}

/// Moves the front end to another view.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that only logs; used by the terminal front end, which exits
/// once the user lands on home.
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: Route) {
        info!(path = route.path(), "Navigating");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_keeps_latest_user() {
        let store = SessionStore::new();
        assert!(store.current_user().is_none());

        store.set_current_user(RegisteredUser::new(serde_json::json!({"username": "ada"})));
        let user = store.current_user().unwrap();
        assert_eq!(user.display_name(), Some("ada"));

        store.set_current_user(RegisteredUser::new(serde_json::json!({"username": "grace"})));
        assert_eq!(store.current_user().unwrap().display_name(), Some("grace"));
    }

    #[test]
    fn home_path() {
        assert_eq!(Route::Home.path(), "/home");
    }
}
