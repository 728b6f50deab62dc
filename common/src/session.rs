//! Session state: auth token and UI preferences.
//!
//! The process-wide store that owns it lives with the host (a reactive
//! signal in the web crate); everything here treats it as a value.

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Key under which preferences are persisted in browser storage.
pub const PREFERENCES_STORAGE_KEY: &str = "taskmap.preferences";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    pub token: Option<String>,
    pub username: Option<String>,
}

impl AuthState {
    /// The token, if it is usable.  An empty token counts as logged out.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub map_shown: bool,
    /// Task action the listing is filtered for (`any`, `map`, `validate`).
    pub action: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            map_shown: false,
            action: "any".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub auth: AuthState,
    pub preferences: Preferences,
}

impl SessionState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            auth: AuthState::default(),
            preferences: Preferences {
                map_shown: config.map_shown,
                action: config.default_action.clone(),
            },
        }
    }

    /// Action to send with list fetches; `any` means no action filter.
    pub fn action_param(&self) -> Option<&str> {
        let action = self.preferences.action.as_str();
        (!action.is_empty() && action != "any").then_some(action)
    }

    pub fn log_in(&mut self, token: impl Into<String>, username: impl Into<String>) {
        self.auth = AuthState {
            token: Some(token.into()),
            username: Some(username.into()),
        };
    }

    pub fn log_out(&mut self) {
        self.auth = AuthState::default();
    }

    pub fn toggle_map(&mut self) {
        self.preferences.map_shown = !self.preferences.map_shown;
    }
}
