//! Domain error types.

/// Top-level error type for dbsmonitor.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
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

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    DataUnavailable {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("series misaligned: {reason}")]
    AlignmentMismatch { reason: String },

    #[error("chart error: {reason}")]
    Chart { reason: String },

    #[error("notify error: {reason}")]
    Notify { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&MonitorError> for std::process::ExitCode {
    fn from(err: &MonitorError) -> Self {
        let code: u8 = match err {
            MonitorError::Io(_) | MonitorError::Chart { .. } => 1,
            MonitorError::ConfigParse { .. }
            | MonitorError::ConfigMissing { .. }
            | MonitorError::ConfigInvalid { .. } => 2,
            MonitorError::Data { .. }
            | MonitorError::DataUnavailable { .. }
            | MonitorError::AlignmentMismatch { .. } => 5,
            MonitorError::Notify { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
