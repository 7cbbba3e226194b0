//! Port traits for the collaborators around the Dbs pipeline.

pub mod data_port;
pub mod config_port;
pub mod notifier_port;
pub mod chart_port;
