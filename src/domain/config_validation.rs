//! Configuration validation.
//!
//! Validates all config fields before any data is fetched.

use crate::domain::error::MonitorError;
use crate::domain::indicator::roc::ROC_PERIOD;
use crate::domain::indicator::sma::DBS_PERIOD;
use crate::domain::trend::DBS_LIMIT;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_WEEKS: i64 = 52;
pub const MAX_WEEKS: i64 = 5200;

pub fn validate_monitor_config(config: &dyn ConfigPort) -> Result<(), MonitorError> {
    validate_data_dir(config)?;
    validate_weeks(config)?;
    validate_symbols(config)?;
    validate_periods(config)?;
    validate_limit(config)?;
    Ok(())
}

fn validate_data_dir(config: &dyn ConfigPort) -> Result<(), MonitorError> {
    match config.get_string("data", "dir") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(MonitorError::ConfigMissing {
            section: "data".to_string(),
            key: "dir".to_string(),
        }),
    }
}

fn validate_weeks(config: &dyn ConfigPort) -> Result<(), MonitorError> {
    let value = config.get_int("data", "weeks", DEFAULT_WEEKS);
    if !(1..=MAX_WEEKS).contains(&value) {
        return Err(MonitorError::ConfigInvalid {
            section: "data".to_string(),
            key: "weeks".to_string(),
            reason: format!("weeks must be between 1 and {}", MAX_WEEKS),
        });
    }
    Ok(())
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<(), MonitorError> {
    for key in ["sector", "market", "reference"] {
        if let Some(s) = config.get_string("symbols", key) {
            if !is_valid_symbol(s.trim()) {
                return Err(MonitorError::ConfigInvalid {
                    section: "symbols".to_string(),
                    key: key.to_string(),
                    reason: format!("invalid symbol '{}'", s),
                });
            }
        }
    }
    Ok(())
}

/// Symbols name data files, so only ticker characters are allowed.
pub fn is_valid_symbol(symbol: &str) -> bool {
    !symbol.is_empty()
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='))
        && !symbol.contains("..")
}

fn validate_periods(config: &dyn ConfigPort) -> Result<(), MonitorError> {
    let defaults = [("roc_period", ROC_PERIOD), ("dbs_period", DBS_PERIOD)];
    for (key, default) in defaults {
        let value = config.get_int("indicator", key, default as i64);
        if value < 1 {
            return Err(MonitorError::ConfigInvalid {
                section: "indicator".to_string(),
                key: key.to_string(),
                reason: format!("{} must be at least 1", key),
            });
        }
    }
    Ok(())
}

fn validate_limit(config: &dyn ConfigPort) -> Result<(), MonitorError> {
    let value = config.get_double("indicator", "dbs_limit", DBS_LIMIT);
    if !value.is_finite() || value <= 0.0 {
        return Err(MonitorError::ConfigInvalid {
            section: "indicator".to_string(),
            key: "dbs_limit".to_string(),
            reason: "dbs_limit must be positive".to_string(),
        });
    }
    Ok(())
}
