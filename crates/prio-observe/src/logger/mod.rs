mod config;
mod error;
mod log;
mod object;

pub use config::{ENV_LOG, ENV_LOG_COLOR, ENV_LOG_FORMAT, ENV_LOG_TZ, LoggerConfig};
pub use error::{LoggerError, LoggerResult};
pub use object::{LoggerFormat, LoggerLevel, LoggerTimeZone, LoggerTimer, init_local_offset};

/// Install the global tracing subscriber described by `cfg`.
///
/// Fails with [`LoggerError::AlreadyInitialized`] when a subscriber is already set.
/// With [`LoggerTimeZone::Local`], call [`init_local_offset`] before starting the runtime.
///
/// ```rust,no_run
/// use prio_observe::{LoggerConfig, init_logger};
///
/// let cfg = LoggerConfig::from_env().expect("valid PRIO_LOG* variables");
/// init_logger(&cfg).expect("logger installed once");
/// tracing::info!("logger ready");
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    match cfg.format {
        LoggerFormat::Text => log::logger_text(cfg),
        LoggerFormat::Json => log::logger_json(cfg),
        LoggerFormat::Journald => log::logger_journald(cfg),
    }
}
