use serde::{Deserialize, Serialize};
use std::io::IsTerminal;

use crate::logger::{
    error::{LoggerError, LoggerResult},
    object::{LoggerFormat, LoggerLevel, LoggerTimeZone},
};

/// Filter directives, e.g. `PRIO_LOG=prio_core=debug,info`.
pub const ENV_LOG: &str = "PRIO_LOG";
/// `text`, `json` or `journald`.
pub const ENV_LOG_FORMAT: &str = "PRIO_LOG_FORMAT";
/// `utc` or `local`.
pub const ENV_LOG_TZ: &str = "PRIO_LOG_TZ";
/// `true`/`false`, `1`/`0`, `on`/`off`.
pub const ENV_LOG_COLOR: &str = "PRIO_LOG_COLOR";

/// Logger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    pub level: LoggerLevel,
    pub tz: LoggerTimeZone,
    /// Include module targets in text/json output.
    pub with_targets: bool,
    /// Allow ANSI colors. Only honoured when stdout is a terminal.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Defaults overridden by `PRIO_LOG*` environment variables.
    pub fn from_env() -> LoggerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> LoggerResult<Self> {
        let mut cfg = Self::default();
        if let Some(v) = lookup(ENV_LOG) {
            cfg.level = v.parse()?;
        }
        if let Some(v) = lookup(ENV_LOG_FORMAT) {
            cfg.format = v.parse()?;
        }
        if let Some(v) = lookup(ENV_LOG_TZ) {
            cfg.tz = v.parse()?;
        }
        if let Some(v) = lookup(ENV_LOG_COLOR) {
            cfg.use_color = parse_switch(ENV_LOG_COLOR, &v)?;
        }
        Ok(cfg)
    }

    /// Color only when enabled and stdout is a terminal.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }
}

fn parse_switch(var: &'static str, value: &str) -> LoggerResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(LoggerError::InvalidEnv {
            var,
            value: value.to_string(),
        }),
    }
}
