//! Integration tests for the Dbs pipeline.
//!
//! Tests cover:
//! - End-to-end run over a synthetic fixture that turns BULLISH at row 20
//! - Fatal preconditions: empty, short and misaligned provider data
//! - Chart and notifier collaborators driven by `run_monitor_pipeline`

mod common;

use approx::assert_relative_eq;
use common::*;
use dbsmonitor::cli::run_monitor_pipeline;
use dbsmonitor::domain::dbs::DbsTable;
use dbsmonitor::domain::error::MonitorError;
use dbsmonitor::domain::monitor::{run_pipeline, MonitorConfig};
use dbsmonitor::domain::trend::{Alert, TrendRegime};
use dbsmonitor::ports::chart_port::ChartPort;
use dbsmonitor::ports::notifier_port::NotifierPort;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

fn fixture_config() -> MonitorConfig {
    MonitorConfig {
        roc_period: 5,
        ..MonitorConfig::default()
    }
}

#[derive(Default)]
struct RecordingNotifier {
    sent: RefCell<Vec<Alert>>,
}

impl NotifierPort for RecordingNotifier {
    fn notify(&self, alert: &Alert) -> Result<(), MonitorError> {
        self.sent.borrow_mut().push(alert.clone());
        Ok(())
    }
}

struct FailingNotifier;

impl NotifierPort for FailingNotifier {
    fn notify(&self, _alert: &Alert) -> Result<(), MonitorError> {
        Err(MonitorError::Notify {
            reason: "smtp down".into(),
        })
    }
}

#[derive(Default)]
struct RecordingChart {
    rendered: RefCell<Vec<(usize, Vec<i8>, PathBuf)>>,
}

impl ChartPort for RecordingChart {
    fn render(&self, table: &DbsTable, limit: f64, output_path: &Path) -> Result<(), MonitorError> {
        self.rendered
            .borrow_mut()
            .push((table.len(), table.tags(limit), output_path.to_path_buf()));
        Ok(())
    }
}

mod end_to_end {
    use super::*;

    #[test]
    fn fixture_turns_bullish_at_row_20() {
        let port = fixture_port();
        let run = run_pipeline(&port, &fixture_config(), fixture_date(20)).unwrap();

        assert_eq!(run.table.len(), 21);
        let (prev, curr) = run.table.last_two().unwrap();
        assert_eq!(prev.date(), fixture_date(19));
        assert_relative_eq!(prev.dbs_ma.unwrap(), -28.0 / 9.0, epsilon = 1e-9);
        assert_relative_eq!(curr.dbs_ma.unwrap(), -4.0, epsilon = 1e-9);

        assert_eq!(run.evaluation.previous, Some(TrendRegime::Neutral));
        assert_eq!(run.evaluation.current, Some(TrendRegime::Bullish));

        let alert = &run.evaluation.alert;
        assert_eq!(alert.subject, "Dbs trend shift to BULLISH");
        assert!(alert.subject.ends_with("trend shift to BULLISH"));
        assert!(!alert.body.is_empty());
        assert!(alert.body.contains("Date: 2024-01-21"));
    }

    #[test]
    fn fixture_day_before_is_silent() {
        let port = fixture_port();
        let run = run_pipeline(&port, &fixture_config(), fixture_date(19)).unwrap();

        assert_eq!(run.table.len(), 20);
        assert!(run.evaluation.alert.is_empty());
        assert_eq!(run.evaluation.current, Some(TrendRegime::Neutral));
    }

    #[test]
    fn fixture_stays_bullish_after_shift() {
        let port = fixture_port();
        let run = run_pipeline(&port, &fixture_config(), fixture_date(25)).unwrap();

        assert_eq!(run.evaluation.previous, Some(TrendRegime::Bullish));
        assert_eq!(run.evaluation.current, Some(TrendRegime::Bullish));
        assert!(run.evaluation.alert.subject.is_empty());
        assert!(run.evaluation.alert.body.is_empty());
    }

    #[test]
    fn table_columns_follow_pipeline() {
        let port = fixture_port();
        let run = run_pipeline(&port, &fixture_config(), fixture_date(29)).unwrap();
        let rows = &run.table.rows;

        assert!(rows[..5].iter().all(|r| r.dbs.is_none() && r.roc_close.is_none()));
        assert_eq!(rows[5].dbs, Some(4));
        assert_eq!(rows[12].dbs, Some(-4));
        assert!(rows[..13].iter().all(|r| r.dbs_ma.is_none()));
        assert_relative_eq!(rows[13].dbs_ma.unwrap(), 4.0 * 7.0 / 9.0 - 4.0 * 2.0 / 9.0, epsilon = 1e-9);
        assert_relative_eq!(rows[29].reference.close, 499.0);

        let tags = run.table.tags(3.75);
        assert_eq!(tags[19], 0);
        assert_eq!(tags[20], -1);
        assert_eq!(tags[29], -1);
    }

    #[test]
    fn default_periods_on_short_window_are_unavailable() {
        let port = fixture_port();
        let err = run_pipeline(&port, &MonitorConfig::default(), fixture_date(20)).unwrap_err();
        assert!(matches!(
            err,
            MonitorError::DataUnavailable { ref symbol, bars: 21, minimum: 29 } if symbol == "XLU"
        ));
    }
}

mod preconditions {
    use super::*;

    #[test]
    fn empty_series_is_fatal() {
        let port = MockDataPort::new()
            .with_bars("XLU", flat_bars("XLU", 30, |_| 60.0))
            .with_bars("VTI", flat_bars("VTI", 30, |_| 200.0));

        let err = run_pipeline(&port, &fixture_config(), fixture_date(29)).unwrap_err();
        assert!(matches!(
            err,
            MonitorError::DataUnavailable { ref symbol, bars: 0, .. } if symbol == "SPY"
        ));
    }

    #[test]
    fn provider_error_propagates() {
        let port = fixture_port().with_error("VTI", "connection reset");
        let err = run_pipeline(&port, &fixture_config(), fixture_date(29)).unwrap_err();
        assert!(matches!(err, MonitorError::Data { ref reason } if reason == "connection reset"));
    }

    #[test]
    fn misaligned_market_is_fatal() {
        let mut vti = flat_bars("VTI", 30, |_| 100.0);
        vti.remove(10);
        let port = fixture_port().with_bars("VTI", vti);

        let err = run_pipeline(&port, &fixture_config(), fixture_date(29)).unwrap_err();
        assert!(matches!(err, MonitorError::AlignmentMismatch { .. }));
    }

    #[test]
    fn misaligned_reference_is_fatal() {
        let mut spy = flat_bars("SPY", 30, |i| 470.0 + i as f64);
        spy.remove(3);
        let port = fixture_port().with_bars("SPY", spy);

        let err = run_pipeline(&port, &fixture_config(), fixture_date(29)).unwrap_err();
        assert!(matches!(err, MonitorError::AlignmentMismatch { .. }));
    }

    #[test]
    fn duplicate_dates_are_fatal() {
        let mut xlu = flat_bars("XLU", 30, |i| 100.0 * fixture_ratio(i));
        xlu[6].date = xlu[5].date;
        let port = fixture_port().with_bars("XLU", xlu);

        let err = run_pipeline(&port, &fixture_config(), fixture_date(29)).unwrap_err();
        assert!(matches!(err, MonitorError::AlignmentMismatch { .. }));
    }

    #[test]
    fn zero_market_price_leaves_gap_not_error() {
        let mut vti = flat_bars("VTI", 30, |_| 100.0);
        vti[8].close = 0.0;
        let port = fixture_port().with_bars("VTI", vti);

        let run = run_pipeline(&port, &fixture_config(), fixture_date(29)).unwrap();
        let rows = &run.table.rows;
        assert_eq!(rows[8].dbs, None);
        assert_eq!(rows[13].dbs, None);
        assert!(rows[16].dbs_ma.is_none());
        assert!(rows[17].dbs_ma.is_none());
        assert!(rows[22].dbs_ma.is_some());
    }
}

mod collaborators {
    use super::*;

    #[test]
    fn alert_is_charted_and_delivered() {
        let port = fixture_port();
        let chart = RecordingChart::default();
        let notifier = RecordingNotifier::default();
        let chart_path = PathBuf::from("dbs.svg");

        let run = run_monitor_pipeline(
            &port,
            &fixture_config(),
            fixture_date(20),
            Some((&chart as &dyn ChartPort, chart_path.as_path())),
            Some(&notifier as &dyn NotifierPort),
        )
        .unwrap();

        let sent = notifier.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], run.evaluation.alert);

        let rendered = chart.rendered.borrow();
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].0, 21);
        assert_eq!(rendered[0].1[20], -1);
        assert_eq!(rendered[0].2, chart_path);
    }

    #[test]
    fn no_transition_means_no_delivery() {
        let port = fixture_port();
        let notifier = RecordingNotifier::default();

        let run = run_monitor_pipeline(
            &port,
            &fixture_config(),
            fixture_date(25),
            None,
            Some(&notifier as &dyn NotifierPort),
        )
        .unwrap();

        assert!(run.evaluation.alert.is_empty());
        assert!(notifier.sent.borrow().is_empty());
    }

    #[test]
    fn missing_notifier_is_not_an_error() {
        let port = fixture_port();
        let run = run_monitor_pipeline(&port, &fixture_config(), fixture_date(20), None, None)
            .unwrap();
        assert!(!run.evaluation.alert.is_empty());
    }

    #[test]
    fn notifier_failure_surfaces() {
        let port = fixture_port();
        let err = run_monitor_pipeline(
            &port,
            &fixture_config(),
            fixture_date(20),
            None,
            Some(&FailingNotifier as &dyn NotifierPort),
        )
        .unwrap_err();
        assert!(matches!(err, MonitorError::Notify { .. }));
    }
}
