//! Per-user preferences.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ParseEnumError;

/// Default generation timeout in seconds.
pub const DEFAULT_QUERY_TIMEOUT: u64 = 30;

/// Accepted range for `query_timeout`.
pub const QUERY_TIMEOUT_RANGE: std::ops::RangeInclusive<u64> = 1..=300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            other => Err(ParseEnumError::new("theme", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    pub theme: Theme,
    /// Seconds allowed for a generation call.
    pub query_timeout: u64,
    /// When false, generated SQL is neither returned nor persisted.
    pub show_sql_queries: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            show_sql_queries: true,
        }
    }
}

/// Partial settings update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub query_timeout: Option<u64>,
    #[serde(default)]
    pub show_sql_queries: Option<bool>,
}

impl UserSettings {
    /// Apply a partial update, rejecting out-of-range values.
    pub fn merged(mut self, update: &SettingsUpdate) -> Result<Self, String> {
        if let Some(theme) = &update.theme {
            self.theme = theme.parse().map_err(|e: ParseEnumError| e.to_string())?;
        }
        if let Some(timeout) = update.query_timeout {
            if !QUERY_TIMEOUT_RANGE.contains(&timeout) {
                return Err(format!(
                    "query_timeout must be between {} and {} seconds",
                    QUERY_TIMEOUT_RANGE.start(),
                    QUERY_TIMEOUT_RANGE.end()
                ));
            }
            self.query_timeout = timeout;
        }
        if let Some(show) = update.show_sql_queries {
            self.show_sql_queries = show;
        }
        Ok(self)
    }
}
