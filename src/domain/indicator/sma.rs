//! Trailing simple moving average of the Dbs signal.
//!
//! SMA(n)[i] = mean(Dbs[i-n+1..=i])
//! Defined only when all n values in the window are defined, so the
//! first (n-1) points and any window touching a gap are undefined.

use crate::domain::indicator::signal::SignalPoint;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};

pub const DBS_PERIOD: usize = 9;

pub fn calculate_sma(signal: &[SignalPoint], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(signal.len());

    for (i, point) in signal.iter().enumerate() {
        let value = if period > 0 && i + 1 >= period {
            let window = &signal[i + 1 - period..=i];
            window
                .iter()
                .map(|p| p.dbs)
                .sum::<Option<i32>>()
                .map(|sum| sum as f64 / period as f64)
        } else {
            None
        };
        values.push(IndicatorPoint::new(point.date, value));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}
