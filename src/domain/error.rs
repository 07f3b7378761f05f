//! Domain error types.

use crate::domain::universe::UniverseError;

/// Top-level error type for pullbacktrader.
#[derive(Debug, thiserror::Error)]
pub enum TraderError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("market data error for {instrument}: {reason}")]
    Data { instrument: String, reason: String },

    #[error("invalid price series for {instrument}: {reason}")]
    InvalidSeries { instrument: String, reason: String },

    #[error("account snapshot unavailable: {reason}")]
    AccountUnavailable { reason: String },

    #[error("no tick for {instrument}")]
    TickUnavailable { instrument: String },

    #[error("invalid symbol list: {0}")]
    Universe(#[from] UniverseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TraderError> for std::process::ExitCode {
    fn from(err: &TraderError) -> Self {
        let code: u8 = match err {
            TraderError::Io(_) => 1,
            TraderError::ConfigParse { .. }
            | TraderError::ConfigMissing { .. }
            | TraderError::ConfigInvalid { .. }
            | TraderError::Universe(_) => 2,
            TraderError::Data { .. }
            | TraderError::InvalidSeries { .. }
            | TraderError::TickUnavailable { .. } => 3,
            TraderError::AccountUnavailable { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
