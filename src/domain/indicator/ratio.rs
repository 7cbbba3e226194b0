//! Relative strength ratio of two aligned OHLCV series.
//!
//! RATIO.f[i] = numerator.f[i] / denominator.f[i] for every field f.
//! A zero denominator leaves the point undefined.

use crate::domain::error::MonitorError;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::{Field, OhlcvBar};
use crate::domain::timeline::{bar_dates, ensure_same_axis};

/// One ratio column per OHLCV field, all on the same date axis.
#[derive(Debug, Clone)]
pub struct RatioTable {
    pub open: IndicatorSeries,
    pub high: IndicatorSeries,
    pub low: IndicatorSeries,
    pub close: IndicatorSeries,
    pub adjusted: IndicatorSeries,
    pub volume: IndicatorSeries,
}

impl RatioTable {
    pub fn column(&self, field: Field) -> &IndicatorSeries {
        match field {
            Field::Open => &self.open,
            Field::High => &self.high,
            Field::Low => &self.low,
            Field::Close => &self.close,
            Field::Adjusted => &self.adjusted,
            Field::Volume => &self.volume,
        }
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }
}

fn ratio_column(numerator: &[OhlcvBar], denominator: &[OhlcvBar], field: Field) -> IndicatorSeries {
    let values = numerator
        .iter()
        .zip(denominator)
        .map(|(num, den)| {
            let d = den.field(field);
            let value = if d == 0.0 {
                None
            } else {
                Some(num.field(field) / d)
            };
            IndicatorPoint::new(num.date, value)
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Ratio(field),
        values,
    }
}

pub fn calculate_ratio(
    numerator: &[OhlcvBar],
    denominator: &[OhlcvBar],
) -> Result<RatioTable, MonitorError> {
    let num_name = numerator.first().map_or("numerator", |b| b.symbol.as_str());
    let den_name = denominator.first().map_or("denominator", |b| b.symbol.as_str());
    ensure_same_axis(num_name, bar_dates(numerator), den_name, bar_dates(denominator))?;

    Ok(RatioTable {
        open: ratio_column(numerator, denominator, Field::Open),
        high: ratio_column(numerator, denominator, Field::High),
        low: ratio_column(numerator, denominator, Field::Low),
        close: ratio_column(numerator, denominator, Field::Close),
        adjusted: ratio_column(numerator, denominator, Field::Adjusted),
        volume: ratio_column(numerator, denominator, Field::Volume),
    })
}
