//! CLI definition and dispatch.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::outbox_notifier::OutboxNotifier;
use crate::adapters::svg_chart::SvgChartAdapter;
use crate::domain::config_validation::{validate_monitor_config, DEFAULT_WEEKS};
use crate::domain::dbs::DbsTable;
use crate::domain::error::MonitorError;
use crate::domain::indicator::roc::ROC_PERIOD;
use crate::domain::indicator::sma::DBS_PERIOD;
use crate::domain::monitor::{run_pipeline, MonitorConfig, MonitorRun};
use crate::domain::trend::{TrendAlertEngine, DBS_LIMIT, DEFAULT_CHART_URL, DEFAULT_REPO_URL};
use crate::ports::chart_port::ChartPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::notifier_port::NotifierPort;

#[derive(Parser, Debug)]
#[command(name = "dbsmonitor", about = "Sector breadth (Dbs) trend monitor")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the indicator, render the chart and send an alert on a trend shift
    Run {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Run date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Compute and report, but do not notify
        #[arg(long)]
        dry_run: bool,
    },
    /// Write the indicator table as CSV
    Table {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            date,
            dry_run,
        } => run_monitor(config.as_ref(), date, dry_run),
        Command::Table {
            config,
            date,
            output,
        } => run_table(config.as_ref(), date, output.as_ref()),
        Command::Validate { config } => run_validate(&config),
    }
}

fn fail(err: MonitorError) -> ExitCode {
    log::error!("{err}");
    (&err).into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, MonitorError> {
    FileConfigAdapter::from_file(path).map_err(|e| MonitorError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// A config file supersedes the environment.
pub fn resolve_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, MonitorError> {
    let adapter = match path {
        Some(p) => {
            log::info!("Loading config from {}", p.display());
            load_config(p)?
        }
        None => {
            log::info!("No config file given, reading DBSMONITOR_* environment");
            FileConfigAdapter::from_env()
        }
    };
    validate_monitor_config(&adapter)?;
    Ok(adapter)
}

fn symbol_or(config: &dyn ConfigPort, key: &str, default: &str) -> String {
    config
        .get_string("symbols", key)
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

pub fn build_monitor_config(config: &dyn ConfigPort) -> MonitorConfig {
    let defaults = MonitorConfig::default();
    MonitorConfig {
        sector: symbol_or(config, "sector", &defaults.sector),
        market: symbol_or(config, "market", &defaults.market),
        reference: symbol_or(config, "reference", &defaults.reference),
        weeks: config.get_int("data", "weeks", DEFAULT_WEEKS),
        roc_period: config.get_int("indicator", "roc_period", ROC_PERIOD as i64) as usize,
        dbs_period: config.get_int("indicator", "dbs_period", DBS_PERIOD as i64) as usize,
        engine: TrendAlertEngine {
            limit: config.get_double("indicator", "dbs_limit", DBS_LIMIT),
            chart_url: config
                .get_string("alert", "chart_url")
                .unwrap_or_else(|| DEFAULT_CHART_URL.to_string()),
            repo_url: config
                .get_string("alert", "repo_url")
                .unwrap_or_else(|| DEFAULT_REPO_URL.to_string()),
        },
    }
}

fn data_adapter(config: &dyn ConfigPort) -> Result<CsvAdapter, MonitorError> {
    let dir = config
        .get_string("data", "dir")
        .ok_or_else(|| MonitorError::ConfigMissing {
            section: "data".into(),
            key: "dir".into(),
        })?;
    Ok(CsvAdapter::new(PathBuf::from(dir)))
}

fn run_monitor(config_path: Option<&PathBuf>, date: Option<NaiveDate>, dry_run: bool) -> ExitCode {
    let adapter = match resolve_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(e),
    };
    let data_port = match data_adapter(&adapter) {
        Ok(d) => d,
        Err(e) => return fail(e),
    };

    let monitor_config = build_monitor_config(&adapter);
    let chart_path = adapter.get_string("chart", "path").map(PathBuf::from);
    let notifier = adapter
        .get_string("notify", "outbox")
        .filter(|s| !s.trim().is_empty())
        .map(|s| OutboxNotifier::new(PathBuf::from(s)));

    let run_date = date.unwrap_or_else(|| Local::now().date_naive());
    let notifier: Option<&dyn NotifierPort> = if dry_run {
        None
    } else {
        notifier.as_ref().map(|n| n as &dyn NotifierPort)
    };

    match run_monitor_pipeline(
        &data_port,
        &monitor_config,
        run_date,
        chart_path.as_deref().map(|p| (&SvgChartAdapter as &dyn ChartPort, p)),
        notifier,
    ) {
        Ok(run) => {
            if run.evaluation.alert.is_empty() {
                println!("No trend shift on {}", run.run_date);
            } else {
                println!("{}", run.evaluation.alert.subject);
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

/// Full run against explicit collaborators: compute, chart, alert, notify.
pub fn run_monitor_pipeline(
    data_port: &dyn DataPort,
    config: &MonitorConfig,
    run_date: NaiveDate,
    chart: Option<(&dyn ChartPort, &Path)>,
    notifier: Option<&dyn NotifierPort>,
) -> Result<MonitorRun, MonitorError> {
    log::info!(
        "Running Dbs monitor for {}: {}/{} vs {}",
        run_date,
        config.sector,
        config.market,
        config.reference
    );
    let run = run_pipeline(data_port, config, run_date)?;

    if let Some((chart_port, path)) = chart {
        chart_port.render(&run.table, config.engine.limit, path)?;
    }

    let alert = &run.evaluation.alert;
    if alert.is_empty() {
        log::info!("No trend shift detected");
    } else {
        log::info!("Alert: {}", alert.subject);
        match notifier {
            Some(n) => n.notify(alert)?,
            None => log::warn!("No notifier configured, alert not delivered"),
        }
    }

    Ok(run)
}

fn run_table(
    config_path: Option<&PathBuf>,
    date: Option<NaiveDate>,
    output: Option<&PathBuf>,
) -> ExitCode {
    let adapter = match resolve_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(e),
    };
    let data_port = match data_adapter(&adapter) {
        Ok(d) => d,
        Err(e) => return fail(e),
    };
    let monitor_config = build_monitor_config(&adapter);
    let run_date = date.unwrap_or_else(|| Local::now().date_naive());

    let run = match run_pipeline(&data_port, &monitor_config, run_date) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };

    let result = match output {
        Some(path) => std::fs::File::create(path)
            .map_err(MonitorError::from)
            .and_then(|file| write_table_csv(&run.table, file)),
        None => write_table_csv(&run.table, io::stdout().lock()),
    };

    match result {
        Ok(()) => {
            if let Some(path) = output {
                log::info!("Table written to {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

pub fn write_table_csv<W: io::Write>(table: &DbsTable, writer: W) -> Result<(), MonitorError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in table.export_records() {
        wtr.serialize(record).map_err(|e| MonitorError::Io(io::Error::other(e)))?;
    }
    wtr.flush()?;
    Ok(())
}

fn run_validate(config_path: &Path) -> ExitCode {
    log::info!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path).and_then(|a| {
        validate_monitor_config(&a)?;
        Ok(a)
    }) {
        Ok(a) => a,
        Err(e) => return fail(e),
    };

    let config = build_monitor_config(&adapter);
    eprintln!("Ratio:      {}/{}", config.sector, config.market);
    eprintln!("Reference:  {}", config.reference);
    eprintln!("Window:     {} weeks", config.weeks);
    eprintln!("ROC period: {}", config.roc_period);
    eprintln!("Dbs period: {}", config.dbs_period);
    eprintln!("Dbs limit:  {}", config.engine.limit);
    eprintln!("Min bars:   {}", config.min_bars());
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
