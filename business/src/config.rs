//! Runtime configuration for the business layer.
//!
//! Defaults are compiled in per environment feature; on native targets the
//! `ROSTER_API_BASE_URL` and `ROSTER_SERVICE_KEY` variables override them at
//! startup. On wasm the base URL stays empty so every request resolves
//! against the page origin.

use roster_states::{State, state_assign_impl};
use std::any::Any;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    /// Optional service key for the directory API.
    ///
    /// When present, every directory call sends it as a bearer token in the
    /// `authorization` header.
    pub service_key: Option<String>,
}

impl AppConfig {
    pub fn new(base_url: String) -> Self {
        Self {
            api_base_url: base_url,
            service_key: None,
        }
    }

    /// Build the runtime config: compiled-in defaults, then environment
    /// overrides on native targets.
    pub fn load() -> Self {
        #[allow(unused_mut)]
        let mut config = Self::default();

        #[cfg(not(target_arch = "wasm32"))]
        match read_env_overrides() {
            Ok(overrides) => config.apply(overrides),
            Err(err) => log::warn!("config: environment overrides ignored: {err}"),
        }

        config
    }

    pub fn service_key(&self) -> Option<&str> {
        self.service_key.as_deref()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn apply(&mut self, overrides: EnvOverrides) {
        if let Some(base) = overrides
            .roster_api_base_url
            .filter(|value| !value.trim().is_empty())
        {
            self.api_base_url = base;
        }
        if let Some(key) = overrides
            .roster_service_key
            .filter(|value| !value.trim().is_empty())
        {
            self.service_key = Some(key);
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: if cfg!(target_arch = "wasm32") {
                "".to_string()
            } else if cfg!(feature = "env_local") {
                "http://localhost:8090".to_string()
            } else if cfg!(feature = "env_staging") {
                "https://directory-staging.rosterapp.io".to_string()
            } else if cfg!(feature = "env_nightly") {
                "https://directory-nightly.rosterapp.io".to_string()
            } else if cfg!(feature = "env_pr") {
                "https://directory-pr.rosterapp.io".to_string()
            } else {
                "https://directory.rosterapp.io".to_string()
            },
            service_key: None,
        }
    }
}

impl State for AppConfig {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send + 'static>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

/// Environment overrides, deserialized from uppercased variable names.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, serde::Deserialize)]
struct EnvOverrides {
    roster_api_base_url: Option<String>,
    roster_service_key: Option<String>,
}

#[cfg(not(target_arch = "wasm32"))]
fn read_env_overrides() -> Result<EnvOverrides, serde_env::Error> {
    serde_env::from_iter(std::env::vars())
}
