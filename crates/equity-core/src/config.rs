//! Configuration for the profile pipeline and its collaborators.
//!
//! The outbound user agent is part of [`ProfileConfig`] and is handed to
//! each collaborator at construction. It is never stored in process-wide
//! mutable state.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{ProfileError, Result};

/// Default user agent. SEC EDGAR expects "AppName/Version (contact)".
pub const DEFAULT_USER_AGENT: &str = "equity-profile/0.1 (contact@example.com)";

/// Default annual report designator.
pub const DEFAULT_ANNUAL_FILING_TYPE: &str = "10-K";

/// Open interval, in days, that a prior filing's date must fall in
/// relative to the most recent filing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingWindow {
    /// Exclusive lower bound in days.
    pub min_days: i64,
    /// Exclusive upper bound in days.
    pub max_days: i64,
}

impl FilingWindow {
    /// Creates a new window.
    #[must_use]
    pub const fn new(min_days: i64, max_days: i64) -> Self {
        Self { min_days, max_days }
    }

    /// Returns true if `days` lies strictly inside the window.
    #[must_use]
    pub const fn contains(&self, days: i64) -> bool {
        days > self.min_days && days < self.max_days
    }
}

impl Default for FilingWindow {
    fn default() -> Self {
        Self::new(350, 380)
    }
}

/// Settings for a profile build.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// User agent sent with every outbound request.
    pub user_agent: String,
    /// Filing type treated as the annual report.
    pub annual_filing_type: String,
    /// Window used to pair the most recent filing with its prior-year one.
    pub window: FilingWindow,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Minimum interval between Yahoo Finance requests, in milliseconds.
    pub yahoo_rate_limit_ms: u64,
    /// Minimum interval between SEC EDGAR requests, in milliseconds.
    pub edgar_rate_limit_ms: u64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            annual_filing_type: DEFAULT_ANNUAL_FILING_TYPE.to_string(),
            window: FilingWindow::default(),
            request_timeout_secs: 30,
            yahoo_rate_limit_ms: 1000,
            edgar_rate_limit_ms: 100,
        }
    }
}

impl ProfileConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ProfileError::Config(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ProfileError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&contents)
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the prior-filing window.
    #[must_use]
    pub const fn with_window(mut self, window: FilingWindow) -> Self {
        self.window = window;
        self
    }

    /// HTTP request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Checks that the configuration can produce a valid filing pair.
    pub fn validate(&self) -> Result<()> {
        if self.user_agent.trim().is_empty() {
            return Err(ProfileError::Config("User agent must not be empty".to_string()));
        }
        if self.annual_filing_type.trim().is_empty() {
            return Err(ProfileError::Config(
                "Annual filing type must not be empty".to_string(),
            ));
        }
        // A lower bound below zero would let the pair coincide or reverse.
        if self.window.min_days < 0 || self.window.min_days >= self.window.max_days {
            return Err(ProfileError::Config(format!(
                "Invalid filing window ({}, {})",
                self.window.min_days, self.window.max_days
            )));
        }
        Ok(())
    }
}
