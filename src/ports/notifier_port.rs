//! Alert delivery port trait.

use crate::domain::error::MonitorError;
use crate::domain::trend::Alert;

/// Delivers a non-empty alert out of band.
pub trait NotifierPort {
    fn notify(&self, alert: &Alert) -> Result<(), MonitorError>;
}
