//! Outbox notifier: writes each alert as a markdown file that an external
//! mailer or CI step picks up.

use crate::domain::error::MonitorError;
use crate::domain::trend::Alert;
use crate::ports::notifier_port::NotifierPort;
use std::fs;
use std::path::PathBuf;

pub struct OutboxNotifier {
    outbox: PathBuf,
}

impl OutboxNotifier {
    pub fn new(outbox: PathBuf) -> Self {
        Self { outbox }
    }

    pub fn alert_path(&self, alert: &Alert) -> PathBuf {
        let stem = match alert.run_date {
            Some(date) => format!("{}-dbs-alert.md", date),
            None => "dbs-alert.md".to_string(),
        };
        self.outbox.join(stem)
    }
}

impl NotifierPort for OutboxNotifier {
    fn notify(&self, alert: &Alert) -> Result<(), MonitorError> {
        if alert.is_empty() {
            return Err(MonitorError::Notify {
                reason: "refusing to deliver an empty alert".into(),
            });
        }

        fs::create_dir_all(&self.outbox).map_err(|e| MonitorError::Notify {
            reason: format!("failed to create outbox {}: {}", self.outbox.display(), e),
        })?;

        let path = self.alert_path(alert);
        fs::write(&path, format!("{}\n", alert.body)).map_err(|e| MonitorError::Notify {
            reason: format!("failed to write {}: {}", path.display(), e),
        })?;

        log::info!("Alert written to {}", path.display());
        Ok(())
    }
}
