//! Logging configuration and initialization.
//!
//! Targets live under `sqlchat::` (`startup`, `api`, `auth`, `relay`, `chat`,
//! `db`). A preset picks the base levels, `--log target=level` adjusts single
//! targets, and `RUST_LOG` replaces everything when set.

use std::collections::HashMap;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const TARGET_PREFIX: &str = "sqlchat::";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: '{}'. Use 'text' or 'json'.", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogPreset {
    /// Startup, requests and failures
    #[default]
    Production,
    Verbose,
    Debug,
    Trace,
    /// Warnings and errors only
    Quiet,
}

#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub preset: LogPreset,
    /// Full target name to level, e.g. `sqlchat::relay` -> DEBUG
    pub overrides: HashMap<String, Level>,
    pub format: LogFormat,
}

impl LogConfig {
    /// Build from CLI flags. Quiet beats trace beats debug beats verbose.
    pub fn from_cli(
        verbose: bool,
        debug: bool,
        trace: bool,
        quiet: bool,
        log_overrides: Vec<String>,
        format: LogFormat,
    ) -> Self {
        let preset = if quiet {
            LogPreset::Quiet
        } else if trace {
            LogPreset::Trace
        } else if debug {
            LogPreset::Debug
        } else if verbose {
            LogPreset::Verbose
        } else {
            LogPreset::Production
        };

        let overrides = log_overrides
            .iter()
            .flat_map(|arg| arg.split(','))
            .filter_map(|part| {
                let (target, level) = part.split_once('=')?;
                let level = parse_level(level.trim())?;
                Some((qualify_target(target.trim()), level))
            })
            .collect();

        Self {
            preset,
            overrides,
            format,
        }
    }

    fn directives(&self) -> Vec<String> {
        let base: &[&str] = match self.preset {
            LogPreset::Production => &[
                "sqlchat::startup=info",
                "sqlchat::api=info",
                "sqlchat::auth=info",
                "sqlchat::relay=warn",
                "sqlchat::chat=info",
                "sqlchat::db=warn",
                "tower_http=warn",
            ],
            LogPreset::Verbose => &["sqlchat=info", "tower_http=info"],
            LogPreset::Debug => &["sqlchat=debug", "tower_http=debug"],
            LogPreset::Trace => &["sqlchat=trace", "tower_http=trace"],
            LogPreset::Quiet => &["sqlchat=warn", "tower_http=error"],
        };

        let mut directives: Vec<String> = base.iter().map(|d| d.to_string()).collect();
        for (target, level) in &self.overrides {
            directives.push(format!("{}={}", target, level.to_string().to_lowercase()));
        }
        directives
    }

    /// The effective filter; `RUST_LOG` wins when present.
    pub fn build_filter(&self) -> EnvFilter {
        if let Ok(env_filter) = EnvFilter::try_from_default_env() {
            return env_filter;
        }
        EnvFilter::try_new(self.directives().join(",")).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// `relay` -> `sqlchat::relay`; already-qualified and foreign targets pass through.
fn qualify_target(target: &str) -> String {
    if target.starts_with(TARGET_PREFIX) || target == "sqlchat" || target == "tower_http" {
        target.to_string()
    } else {
        format!("{TARGET_PREFIX}{target}")
    }
}

fn parse_level(s: &str) -> Option<Level> {
    match s.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

pub fn init(config: &LogConfig) {
    let filter = config.build_filter();

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(true).with_thread_ids(false))
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE),
                )
                .init();
        }
    }
}
