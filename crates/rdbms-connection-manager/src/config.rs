//! Connection manager configuration.

use rdbms_balancer::{Domain, Groups};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Configuration for a [`ConnectionManager`](crate::ConnectionManager).
///
/// Deserializes from any serde format. In documents the domain is a string
/// or `false` for the local database:
///
/// ```text
/// { "domain": "wikidb", "groups": ["api"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Logical database, or the local one.
    pub domain: Domain,

    /// Groups used when a call site does not pass its own.
    pub groups: Groups,
}

impl ManagerConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from an untyped JSON document.
    ///
    /// Unlike plain deserialization, a bad `domain` is reported as
    /// [`Error::InvalidDomain`]. Unknown keys are ignored.
    pub fn from_json_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::Config("manager config must be a JSON object".into()))?;

        let mut config = Self::default();
        for (key, value) in object {
            match key.as_str() {
                "domain" => config.domain = Domain::try_from(value)?,
                "groups" => {
                    config.groups = serde_json::from_value(value.clone())
                        .map_err(|e| Error::Config(format!("invalid groups: {e}")))?;
                }
                _ => {
                    tracing::debug!(key = %key, "ignoring unknown manager config key");
                }
            }
        }

        Ok(config)
    }

    /// Parse a settings string into configuration.
    ///
    /// Uses the same `key=value;` layout as connection strings:
    /// ```text
    /// Domain=wikidb;Groups=api,dump;
    /// ```
    ///
    /// `false` selects the local database. Any other value, the empty one
    /// included, names a domain.
    pub fn from_settings_string(settings: &str) -> Result<Self> {
        let mut config = Self::default();

        for part in settings.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| Error::Config(format!("invalid key-value: {part}")))?;

            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "domain" | "database" | "db" => {
                    config.domain = if value.eq_ignore_ascii_case("false") {
                        Domain::LOCAL
                    } else {
                        Domain::named(value)
                    };
                }
                "groups" | "group" => {
                    config.groups = value
                        .split(',')
                        .map(str::trim)
                        .filter(|group| !group.is_empty())
                        .collect();
                }
                _ => {
                    // Ignore unknown options for forward compatibility
                    tracing::debug!(
                        key = key,
                        value = value,
                        "ignoring unknown manager setting"
                    );
                }
            }
        }

        Ok(config)
    }

    /// Set the domain.
    #[must_use]
    pub fn domain(mut self, domain: Domain) -> Self {
        self.domain = domain;
        self
    }

    /// Set the default groups.
    #[must_use]
    pub fn groups(mut self, groups: impl Into<Groups>) -> Self {
        self.groups = groups.into();
        self
    }
}
