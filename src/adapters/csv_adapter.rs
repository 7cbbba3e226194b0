//! CSV file data adapter.
//!
//! One file per symbol, `<base_path>/<SYMBOL>.csv`, with header
//! `date,open,high,low,close,adjusted_close,volume`. Columns are looked up
//! by header name, so their order in the file does not matter.

use crate::domain::error::MonitorError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CsvRecord {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(alias = "adjusted", alias = "adj_close")]
    adjusted_close: f64,
    volume: f64,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, MonitorError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| MonitorError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for (line, result) in rdr.deserialize::<CsvRecord>().enumerate() {
            let record = result.map_err(|e| MonitorError::Data {
                reason: format!("{}: CSV parse error: {}", path.display(), e),
            })?;

            let date = NaiveDate::parse_from_str(&record.date, "%Y-%m-%d").map_err(|e| {
                MonitorError::Data {
                    reason: format!(
                        "{}: invalid date '{}' on record {}: {}",
                        path.display(),
                        record.date,
                        line + 1,
                        e
                    ),
                }
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            bars.push(OhlcvBar {
                symbol: symbol.to_string(),
                date,
                open: record.open,
                high: record.high,
                low: record.low,
                close: record.close,
                adjusted_close: record.adjusted_close,
                volume: record.volume.round() as i64,
            });
        }

        bars.sort_by_key(|b| b.date);
        log::debug!("read {} bars from {}", bars.len(), path.display());
        Ok(bars)
    }
}
