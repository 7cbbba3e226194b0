//! ROC (Rate of Change) over a ratio column.
//!
//! ROC(n)[i] = ((V[i] - V[i-n]) / V[i-n]) * 100
//! Warmup: first n points undefined. An undefined or zero V[i-n], or an
//! undefined V[i], leaves ROC[i] undefined.

use crate::domain::indicator::ratio::RatioTable;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::Field;
use chrono::NaiveDate;

pub const ROC_PERIOD: usize = 20;

pub fn calculate_roc(input: &IndicatorSeries, field: Field, period: usize) -> IndicatorSeries {
    let points = &input.values;
    let mut values = Vec::with_capacity(points.len());

    for (i, point) in points.iter().enumerate() {
        let value = if i >= period {
            match (points[i - period].value, point.value) {
                (Some(prev), Some(curr)) if prev != 0.0 => Some(((curr - prev) / prev) * 100.0),
                _ => None,
            }
        } else {
            None
        };
        values.push(IndicatorPoint::new(point.date, value));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Roc { field, period },
        values,
    }
}

/// ROC of the four price fields of a ratio table, one column per field.
#[derive(Debug, Clone)]
pub struct RocTable {
    pub open: IndicatorSeries,
    pub high: IndicatorSeries,
    pub low: IndicatorSeries,
    pub close: IndicatorSeries,
}

impl RocTable {
    pub fn from_ratio(ratio: &RatioTable, period: usize) -> Self {
        Self {
            open: calculate_roc(&ratio.open, Field::Open, period),
            high: calculate_roc(&ratio.high, Field::High, period),
            low: calculate_roc(&ratio.low, Field::Low, period),
            close: calculate_roc(&ratio.close, Field::Close, period),
        }
    }

    pub fn columns(&self) -> [&IndicatorSeries; 4] {
        [&self.open, &self.high, &self.low, &self.close]
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.close.dates().collect()
    }

    /// The four ROC values of a row, in Open, High, Low, Close order.
    pub fn row(&self, index: usize) -> [Option<f64>; 4] {
        self.columns().map(|col| col.value_at(index))
    }
}
