//! OHLCV bar representation and named price fields.

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adjusted_close: f64,
    pub volume: i64,
}

/// A named column of an OHLCV bar. Values are always read by name,
/// never by column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Open,
    High,
    Low,
    Close,
    Adjusted,
    Volume,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Open,
        Field::High,
        Field::Low,
        Field::Close,
        Field::Adjusted,
        Field::Volume,
    ];

    /// The four price fields that vote in the breadth signal.
    pub const PRICE: [Field; 4] = [Field::Open, Field::High, Field::Low, Field::Close];
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Open => "Open",
            Field::High => "High",
            Field::Low => "Low",
            Field::Close => "Close",
            Field::Adjusted => "Adjusted",
            Field::Volume => "Volume",
        };
        f.write_str(name)
    }
}

impl OhlcvBar {
    pub fn field(&self, field: Field) -> f64 {
        match field {
            Field::Open => self.open,
            Field::High => self.high,
            Field::Low => self.low,
            Field::Close => self.close,
            Field::Adjusted => self.adjusted_close,
            Field::Volume => self.volume as f64,
        }
    }
}
