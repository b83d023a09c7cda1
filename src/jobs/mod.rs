use std::time::Duration;

use crate::app_context::AppContext;

mod maintenance;
mod monitor;

pub(crate) use monitor::spawn_monitor_job;

pub fn start_background_jobs(app_context: &AppContext) {
    if let Some(storage) = app_context.storage.clone() {
        maintenance::start_maintenance_job(
            storage,
            Duration::from_secs(app_context.config.storage.maintenance_interval_secs),
        );
    }
}
