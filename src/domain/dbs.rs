//! The Dbs indicator table: reference bars, ROC fields, signal and its
//! moving average, one row per date.

use crate::domain::error::MonitorError;
use crate::domain::indicator::roc::RocTable;
use crate::domain::indicator::signal::SignalPoint;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::timeline::{bar_dates, ensure_same_axis};
use crate::domain::trend::{classify, TrendRegime};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct DbsRow {
    pub reference: OhlcvBar,
    pub roc_open: Option<f64>,
    pub roc_high: Option<f64>,
    pub roc_low: Option<f64>,
    pub roc_close: Option<f64>,
    pub dbs: Option<i32>,
    pub dbs_ma: Option<f64>,
}

impl DbsRow {
    pub fn date(&self) -> NaiveDate {
        self.reference.date
    }

    /// Regime of this row's DbsMa; `None` while DbsMa is undefined.
    pub fn regime(&self, limit: f64) -> Option<TrendRegime> {
        self.dbs_ma.map(|v| classify(v, limit))
    }

    /// Chart highlight marker: +1 above `limit`, -1 below `-limit`, else 0.
    pub fn tag(&self, limit: f64) -> i8 {
        match self.dbs_ma {
            Some(v) if v > limit => 1,
            Some(v) if v < -limit => -1,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DbsTable {
    pub symbol: String,
    pub rows: Vec<DbsRow>,
}

impl DbsTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The second-to-last and last rows, if the table has at least two.
    pub fn last_two(&self) -> Option<(&DbsRow, &DbsRow)> {
        match self.rows.as_slice() {
            [.., prev, curr] => Some((prev, curr)),
            _ => None,
        }
    }

    pub fn tags(&self, limit: f64) -> Vec<i8> {
        self.rows.iter().map(|r| r.tag(limit)).collect()
    }

    pub fn export_records(&self) -> Vec<DbsRecord> {
        self.rows.iter().map(DbsRecord::from).collect()
    }
}

/// Flat CSV shape of a [`DbsRow`].
#[derive(Debug, Serialize)]
pub struct DbsRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Adjusted")]
    pub adjusted: f64,
    #[serde(rename = "Volume")]
    pub volume: i64,
    #[serde(rename = "ROC.Open")]
    pub roc_open: Option<f64>,
    #[serde(rename = "ROC.High")]
    pub roc_high: Option<f64>,
    #[serde(rename = "ROC.Low")]
    pub roc_low: Option<f64>,
    #[serde(rename = "ROC.Close")]
    pub roc_close: Option<f64>,
    #[serde(rename = "Dbs")]
    pub dbs: Option<i32>,
    #[serde(rename = "DbsMa")]
    pub dbs_ma: Option<f64>,
}

impl From<&DbsRow> for DbsRecord {
    fn from(row: &DbsRow) -> Self {
        let bar = &row.reference;
        Self {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            adjusted: bar.adjusted_close,
            volume: bar.volume,
            roc_open: row.roc_open,
            roc_high: row.roc_high,
            roc_low: row.roc_low,
            roc_close: row.roc_close,
            dbs: row.dbs,
            dbs_ma: row.dbs_ma,
        }
    }
}

pub fn build_dbs_table(
    reference: &[OhlcvBar],
    roc: &RocTable,
    signal: &[SignalPoint],
    dbs_period: usize,
) -> Result<DbsTable, MonitorError> {
    let symbol = reference
        .first()
        .map(|b| b.symbol.clone())
        .unwrap_or_default();

    ensure_same_axis(&symbol, bar_dates(reference), "ROC", roc.dates())?;
    ensure_same_axis(&symbol, bar_dates(reference), "Dbs", signal.iter().map(|s| s.date))?;

    let dbs_ma = calculate_sma(signal, dbs_period);

    let rows = reference
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let [roc_open, roc_high, roc_low, roc_close] = roc.row(i);
            DbsRow {
                reference: bar.clone(),
                roc_open,
                roc_high,
                roc_low,
                roc_close,
                dbs: signal[i].dbs,
                dbs_ma: dbs_ma.value_at(i),
            }
        })
        .collect();

    Ok(DbsTable {
        symbol,
        rows,
    })
}
