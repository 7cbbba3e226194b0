//! Dbs breadth signal: sum of sign votes across the four ROC fields.
//!
//! vote(x) = +1 if x >= 0 else -1  (zero is a +1 vote)
//! Dbs[i]  = vote(ROC.Open[i]) + vote(ROC.High[i]) + vote(ROC.Low[i]) + vote(ROC.Close[i])
//! A row with any undefined ROC value has no Dbs.

use crate::domain::indicator::roc::RocTable;
use chrono::NaiveDate;

pub fn vote(roc: f64) -> i32 {
    if roc >= 0.0 { 1 } else { -1 }
}

/// Sum of votes for one row, `None` if any input is undefined.
pub fn sum_votes(row: &[Option<f64>]) -> Option<i32> {
    row.iter().map(|v| v.map(vote)).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalPoint {
    pub date: NaiveDate,
    pub dbs: Option<i32>,
}

pub fn calculate_signal(roc: &RocTable) -> Vec<SignalPoint> {
    roc.dates()
        .into_iter()
        .enumerate()
        .map(|(i, date)| SignalPoint {
            date,
            dbs: sum_votes(&roc.row(i)),
        })
        .collect()
}
