//! Trend regime classification and edge-triggered alerting.
//!
//! Only the last two DbsMa values of a table are compared. An alert is
//! produced when their regimes differ:
//!
//! | Prev    | Curr    | Alert                                  |
//! |---------|---------|----------------------------------------|
//! | same    | same    | none                                   |
//! | trend   | NEUTRAL | "Dbs trend shift to NEUTRAL (bias to prev)" |
//! | NEUTRAL | trend   | "Dbs trend shift to curr"              |
//! | trend   | other trend | "Dbs trend shift to curr"          |

use crate::domain::dbs::DbsTable;
use chrono::NaiveDate;
use std::fmt;

pub const DBS_LIMIT: f64 = 3.75;

pub const DEFAULT_CHART_URL: &str =
    "https://github.com/dennislwm/pyaction/blob/master/_ChartC_0.1_Dbs.png";
pub const DEFAULT_REPO_URL: &str = "https://github.com/dennislwm/pyaction";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendRegime {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for TrendRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrendRegime::Bullish => "BULLISH",
            TrendRegime::Bearish => "BEARISH",
            TrendRegime::Neutral => "NEUTRAL",
        };
        f.write_str(name)
    }
}

/// A high Dbs means the sector is outrunning the market, which reads
/// bearish for the broad market.
pub fn classify(value: f64, limit: f64) -> TrendRegime {
    if value >= limit {
        TrendRegime::Bearish
    } else if value <= -limit {
        TrendRegime::Bullish
    } else {
        TrendRegime::Neutral
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    ToNeutral { bias: TrendRegime },
    ToTrend(TrendRegime),
}

pub fn transition(prev: TrendRegime, curr: TrendRegime) -> Option<Transition> {
    if prev == curr {
        None
    } else if curr == TrendRegime::Neutral {
        Some(Transition::ToNeutral { bias: prev })
    } else {
        // Covers both NEUTRAL -> trend and a direct BULLISH <-> BEARISH flip.
        Some(Transition::ToTrend(curr))
    }
}

impl Transition {
    pub fn subject(&self) -> String {
        match self {
            Transition::ToNeutral { bias } => {
                format!("Dbs trend shift to NEUTRAL (bias to {})", bias)
            }
            Transition::ToTrend(regime) => format!("Dbs trend shift to {}", regime),
        }
    }
}

/// Subject and markdown body. Both are empty when nothing changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alert {
    pub subject: String,
    pub body: String,
    pub run_date: Option<NaiveDate>,
}

impl Alert {
    pub fn is_empty(&self) -> bool {
        self.subject.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendAlertEngine {
    pub limit: f64,
    pub chart_url: String,
    pub repo_url: String,
}

impl Default for TrendAlertEngine {
    fn default() -> Self {
        Self {
            limit: DBS_LIMIT,
            chart_url: DEFAULT_CHART_URL.to_string(),
            repo_url: DEFAULT_REPO_URL.to_string(),
        }
    }
}

/// Outcome of comparing the last two rows.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendEvaluation {
    pub previous: Option<TrendRegime>,
    pub current: Option<TrendRegime>,
    pub alert: Alert,
}

impl TrendAlertEngine {
    pub fn evaluate_values(
        &self,
        previous: Option<f64>,
        current: Option<f64>,
        run_date: NaiveDate,
    ) -> TrendEvaluation {
        let previous = previous.filter(|v| v.is_finite()).map(|v| classify(v, self.limit));
        let current = current.filter(|v| v.is_finite()).map(|v| classify(v, self.limit));

        let alert = match (previous, current) {
            (Some(prev), Some(curr)) => transition(prev, curr)
                .map(|t| self.render(&t, run_date))
                .unwrap_or_default(),
            _ => Alert::default(),
        };

        TrendEvaluation {
            previous,
            current,
            alert,
        }
    }

    pub fn evaluate(&self, table: &DbsTable, run_date: NaiveDate) -> TrendEvaluation {
        match table.last_two() {
            Some((prev, curr)) => self.evaluate_values(prev.dbs_ma, curr.dbs_ma, run_date),
            None => self.evaluate_values(None, None, run_date),
        }
    }

    fn render(&self, transition: &Transition, run_date: NaiveDate) -> Alert {
        let subject = transition.subject();
        let body = format!(
            "# {subject}\n\nDate: {date}\n\n[Dbs Chart]({chart})\n\n[Repository]({repo})",
            subject = subject,
            date = run_date,
            chart = self.chart_url,
            repo = self.repo_url,
        );
        Alert {
            subject,
            body,
            run_date: Some(run_date),
        }
    }
}
