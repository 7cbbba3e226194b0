//! The Dbs monitoring pipeline.
//!
//! sector, market, reference -> ratio -> ROC -> signal -> table -> trend alert
//!
//! Every stage consumes the complete output of the previous one. Structural
//! problems (short or misaligned input) abort the run; undefined numeric
//! values flow through as `None`.

use crate::domain::dbs::{build_dbs_table, DbsTable};
use crate::domain::error::MonitorError;
use crate::domain::indicator::ratio::calculate_ratio;
use crate::domain::indicator::roc::{RocTable, ROC_PERIOD};
use crate::domain::indicator::signal::calculate_signal;
use crate::domain::indicator::sma::DBS_PERIOD;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::timeline::ensure_ascending;
use crate::domain::trend::{TrendAlertEngine, TrendEvaluation, TrendRegime};
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, TimeDelta};

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    pub sector: String,
    pub market: String,
    pub reference: String,
    pub weeks: i64,
    pub roc_period: usize,
    pub dbs_period: usize,
    pub engine: TrendAlertEngine,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sector: "XLU".to_string(),
            market: "VTI".to_string(),
            reference: "SPY".to_string(),
            weeks: 52,
            roc_period: ROC_PERIOD,
            dbs_period: DBS_PERIOD,
            engine: TrendAlertEngine::default(),
        }
    }
}

impl MonitorConfig {
    /// Bars needed for two defined DbsMa rows.
    pub fn min_bars(&self) -> usize {
        self.roc_period + self.dbs_period
    }

    /// Inclusive fetch window ending at `run_date`.
    pub fn window(&self, run_date: NaiveDate) -> Result<(NaiveDate, NaiveDate), MonitorError> {
        TimeDelta::try_weeks(self.weeks)
            .filter(|_| self.weeks >= 1)
            .and_then(|span| run_date.checked_sub_signed(span))
            .map(|start| (start, run_date))
            .ok_or_else(|| MonitorError::ConfigInvalid {
                section: "data".to_string(),
                key: "weeks".to_string(),
                reason: format!("{} weeks before {} is out of range", self.weeks, run_date),
            })
    }
}

#[derive(Debug, Clone)]
pub struct MonitorRun {
    pub run_date: NaiveDate,
    pub table: DbsTable,
    pub evaluation: TrendEvaluation,
}

/// Build the indicator table from three already-fetched series.
pub fn compute_table(
    sector: &[OhlcvBar],
    market: &[OhlcvBar],
    reference: &[OhlcvBar],
    config: &MonitorConfig,
) -> Result<DbsTable, MonitorError> {
    let ratio = calculate_ratio(sector, market)?;
    log::debug!("ratio {}/{}: {} rows", config.sector, config.market, ratio.len());

    let roc = RocTable::from_ratio(&ratio, config.roc_period);
    let signal = calculate_signal(&roc);
    log::debug!(
        "signal: {} of {} rows defined",
        signal.iter().filter(|s| s.dbs.is_some()).count(),
        signal.len()
    );

    build_dbs_table(reference, &roc, &signal, config.dbs_period)
}

pub fn run_pipeline(
    data_port: &dyn DataPort,
    config: &MonitorConfig,
    run_date: NaiveDate,
) -> Result<MonitorRun, MonitorError> {
    let (start, end) = config.window(run_date)?;
    log::info!("Fetching {} to {}", start, end);

    let minimum = config.min_bars();
    let sector = fetch_series(data_port, &config.sector, start, end, minimum)?;
    let market = fetch_series(data_port, &config.market, start, end, minimum)?;
    let reference = fetch_series(data_port, &config.reference, start, end, minimum)?;

    let table = compute_table(&sector, &market, &reference, config)?;
    let evaluation = config.engine.evaluate(&table, run_date);

    if let Some(last) = table.rows.last() {
        log::info!(
            "{}: Dbs {} DbsMa {} ({} -> {})",
            last.date(),
            last.dbs.map_or("-".to_string(), |v| v.to_string()),
            last.dbs_ma.map_or("-".to_string(), |v| format!("{:.3}", v)),
            regime_label(evaluation.previous),
            regime_label(evaluation.current),
        );
    }

    Ok(MonitorRun {
        run_date,
        table,
        evaluation,
    })
}

fn regime_label(regime: Option<TrendRegime>) -> String {
    regime.map_or("undefined".to_string(), |r| r.to_string())
}

fn fetch_series(
    data_port: &dyn DataPort,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    minimum: usize,
) -> Result<Vec<OhlcvBar>, MonitorError> {
    let bars = data_port.fetch_ohlcv(symbol, start, end)?;
    log::debug!("{}: {} bars", symbol, bars.len());

    if bars.len() < minimum {
        return Err(MonitorError::DataUnavailable {
            symbol: symbol.to_string(),
            bars: bars.len(),
            minimum,
        });
    }
    ensure_ascending(symbol, &bars)?;
    Ok(bars)
}
