//! Chart rendering port trait.

use crate::domain::dbs::DbsTable;
use crate::domain::error::MonitorError;
use std::path::Path;

pub trait ChartPort {
    /// Render Dbs and DbsMa, highlighting rows where `|DbsMa| > limit`.
    fn render(&self, table: &DbsTable, limit: f64, output_path: &Path) -> Result<(), MonitorError>;
}
