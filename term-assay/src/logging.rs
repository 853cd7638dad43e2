//! Logging utilities and configuration for Term assay.
//!
//! The library logs through `tracing` with dotted field names
//! (`statement.type`, `entry.index`, `table.rows`). Hosts decide where logs go;
//! [`setup::init_logging`] is a convenience for binaries and tests.

use tracing::Level;

/// Per-suite log verbosity.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Lowest level the suite emits; `DEBUG` or finer enables entry tracing
    pub base_level: Level,
    /// Log each statement's verdict and detail
    pub log_statement_details: bool,
    /// Log a summary after raw tables are coerced
    pub log_coercion: bool,
    /// Log the run metrics when a suite completes
    pub log_metrics: bool,
    /// Longest logged detail, in bytes
    pub max_field_length: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            base_level: Level::INFO,
            log_statement_details: false,
            log_coercion: true,
            log_metrics: true,
            max_field_length: 256,
        }
    }
}

/// Emits `debug!` only when `base_level` admits it.
#[macro_export]
macro_rules! perf_debug {
    ($config:expr, $($arg:tt)*) => {
        if $config.base_level >= tracing::Level::DEBUG {
            tracing::debug!($($arg)*);
        }
    };
}

/// Macro for conditional statement report logging.
#[macro_export]
macro_rules! log_statement {
    ($config:expr, $($arg:tt)*) => {
        if $config.log_statement_details {
            tracing::debug!($($arg)*);
        }
    };
}

/// Macro for conditional coercion logging.
#[macro_export]
macro_rules! log_coercion {
    ($config:expr, $($arg:tt)*) => {
        if $config.log_coercion {
            tracing::info!($($arg)*);
        }
    };
}

/// Truncates a string to at most `max_length` bytes, on a character boundary.
pub fn truncate_field(value: &str, max_length: usize) -> String {
    if value.len() <= max_length {
        return value.to_string();
    }
    let mut end = max_length;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...(truncated)", &value[..end])
}

/// Installation of a global `tracing` subscriber for binaries and tests.
pub mod setup {
    use crate::error::{Result, TermError};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    /// Subscriber settings.
    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        /// `EnvFilter` directives used when `RUST_LOG` is unset
        pub filter: String,
        /// Emit one JSON object per event
        pub json_format: bool,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                filter: "info,term_assay=debug".to_string(),
                json_format: false,
            }
        }
    }

    impl LoggingConfig {
        pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
            self.filter = filter.into();
            self
        }

        pub fn with_json_format(mut self, enabled: bool) -> Self {
            self.json_format = enabled;
            self
        }
    }

    /// Installs a global `tracing` subscriber.
    ///
    /// The configured filter is validated even when `RUST_LOG` overrides it.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use term_assay::logging::setup::{init_logging, LoggingConfig};
    ///
    /// init_logging(&LoggingConfig::default().with_json_format(true)).unwrap();
    /// ```
    pub fn init_logging(config: &LoggingConfig) -> Result<()> {
        let configured = EnvFilter::try_new(&config.filter).map_err(|e| {
            TermError::configuration(format!("invalid log filter '{}': {e}", config.filter))
        })?;
        let env_filter = EnvFilter::try_from_default_env().unwrap_or(configured);

        let fmt_layer = if config.json_format {
            tracing_subscriber::fmt::layer().json().boxed()
        } else {
            tracing_subscriber::fmt::layer().boxed()
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TermError::Internal(format!("failed to install subscriber: {e}")))
    }
}
