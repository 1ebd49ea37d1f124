//! Session configuration

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::contact::{ContactDirectory, ContactId};
use crate::error::ConfigError;

/// Default delay before a simulated reply lands
pub const DEFAULT_REPLY_DELAY_MS: u64 = 5000;

/// Default body of a simulated reply
pub const DEFAULT_REPLY_BODY: &str = "Thanks for the information. I will place the order soon.";

/// Which contact answers outbound messages with a simulated reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponsivePolicy {
    /// The first contact in roster order
    #[default]
    FirstContact,
    /// A specific contact
    Contact(ContactId),
    /// No simulated replies
    Nobody,
}

impl ResponsivePolicy {
    /// Resolve the policy against a roster
    ///
    /// Returns `None` when no roster entry qualifies.
    pub fn resolve(&self, directory: &ContactDirectory) -> Option<ContactId> {
        match self {
            ResponsivePolicy::FirstContact => directory.list().first().map(|c| c.id),
            ResponsivePolicy::Contact(id) => directory.contains(*id).then_some(*id),
            ResponsivePolicy::Nobody => None,
        }
    }
}

/// Behaviour knobs for a messaging session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Milliseconds between an outbound send and the simulated reply
    pub reply_delay_ms: u64,
    /// Which contact replies
    pub responsive: ResponsivePolicy,
    /// Text of the simulated reply
    pub reply_body: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: DEFAULT_REPLY_DELAY_MS,
            responsive: ResponsivePolicy::default(),
            reply_body: DEFAULT_REPLY_BODY.to_string(),
        }
    }
}

impl SessionConfig {
    /// Parse a TOML document; missing keys fall back to defaults
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Delay before a simulated reply
    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }

    /// Set the responsive contact
    pub fn with_responsive(mut self, responsive: ResponsivePolicy) -> Self {
        self.responsive = responsive;
        self
    }

    /// Set the reply delay
    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.reply_delay_ms = delay.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }
}
