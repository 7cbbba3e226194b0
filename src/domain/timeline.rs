//! Timestamp-axis checks shared by every table-building stage.
//!
//! All series joined into one table must share an identical date axis.
//! These checks run before any arithmetic.

use crate::domain::error::MonitorError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

/// Dates must be strictly increasing: ascending and free of duplicates.
pub fn ensure_ascending(symbol: &str, bars: &[OhlcvBar]) -> Result<(), MonitorError> {
    for pair in bars.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(MonitorError::AlignmentMismatch {
                reason: format!(
                    "{} dates not strictly increasing at {} -> {}",
                    symbol, pair[0].date, pair[1].date
                ),
            });
        }
    }
    Ok(())
}

/// Compare two date axes element by element.
pub fn ensure_same_axis<L, R>(
    left_name: &str,
    left: L,
    right_name: &str,
    right: R,
) -> Result<(), MonitorError>
where
    L: IntoIterator<Item = NaiveDate>,
    R: IntoIterator<Item = NaiveDate>,
{
    let left: Vec<NaiveDate> = left.into_iter().collect();
    let right: Vec<NaiveDate> = right.into_iter().collect();

    if left.len() != right.len() {
        return Err(MonitorError::AlignmentMismatch {
            reason: format!(
                "{} has {} rows, {} has {}",
                left_name,
                left.len(),
                right_name,
                right.len()
            ),
        });
    }

    if let Some((i, (l, r))) = left
        .iter()
        .zip(right.iter())
        .enumerate()
        .find(|(_, (l, r))| l != r)
    {
        return Err(MonitorError::AlignmentMismatch {
            reason: format!(
                "row {}: {} is {} but {} is {}",
                i, left_name, l, right_name, r
            ),
        });
    }

    Ok(())
}

pub fn bar_dates(bars: &[OhlcvBar]) -> impl Iterator<Item = NaiveDate> + '_ {
    bars.iter().map(|b| b.date)
}
