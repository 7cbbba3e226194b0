#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use dbsmonitor::domain::error::MonitorError;
pub use dbsmonitor::domain::ohlcv::OhlcvBar;
use dbsmonitor::ports::data_port::DataPort;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, MonitorError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(MonitorError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub const FIXTURE_START: (i32, u32, u32) = (2024, 1, 1);

pub fn fixture_date(row: usize) -> NaiveDate {
    let (y, m, d) = FIXTURE_START;
    date(y, m, d) + Duration::days(row as i64)
}

/// Bars whose price fields all equal `price(row)`.
pub fn flat_bars(symbol: &str, count: usize, price: impl Fn(usize) -> f64) -> Vec<OhlcvBar> {
    (0..count)
        .map(|i| {
            let p = price(i);
            OhlcvBar {
                symbol: symbol.to_string(),
                date: fixture_date(i),
                open: p,
                high: p,
                low: p,
                close: p,
                adjusted_close: p,
                volume: 1000,
            }
        })
        .collect()
}

/// Sector/market ratio for the 30-row fixture: rising through row 11,
/// then falling 0.05 per row.
pub fn fixture_ratio(row: usize) -> f64 {
    if row <= 11 {
        1.0 + 0.01 * row as f64
    } else {
        1.11 - 0.05 * (row - 11) as f64
    }
}

/// 30 rows of XLU, VTI and SPY. With ROC(5) and SMA(9), DbsMa is
/// NEUTRAL at row 19 and reaches -4 (BULLISH) at row 20.
pub fn fixture_port() -> MockDataPort {
    MockDataPort::new()
        .with_bars("XLU", flat_bars("XLU", 30, |i| 100.0 * fixture_ratio(i)))
        .with_bars("VTI", flat_bars("VTI", 30, |_| 100.0))
        .with_bars("SPY", flat_bars("SPY", 30, |i| 470.0 + i as f64))
}

pub fn write_csv(dir: &Path, symbol: &str, bars: &[OhlcvBar]) {
    let mut content = String::from("date,open,high,low,close,adjusted_close,volume\n");
    for b in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.adjusted_close, b.volume
        ));
    }
    fs::write(dir.join(format!("{}.csv", symbol)), content).unwrap();
}
