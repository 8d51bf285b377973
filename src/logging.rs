use std::{fmt::Display, path::Path, time::Duration};

use log::{debug, error, info, warn};

use crate::target::Target;

pub struct PingLogger;

impl PingLogger {
    pub fn config_created(path: &Path) {
        info!("No config at {}, wrote defaults", path.display());
    }

    pub fn config_unknown_field(key: &str, value: &toml::Value) {
        warn!("Unknown configuration '{key}' with value {value:?}");
    }

    pub fn config_save_failed(path: &Path, err: &anyhow::Error) {
        debug!("Could not rewrite config {}: {err}", path.display());
    }

    pub fn query_started(kind: &str, target: &Target) {
        debug!("Starting {kind} query to {target}");
    }

    pub fn query_completed(kind: &str, target: &Target, elapsed: Duration) {
        debug!("{kind} query to {target} completed in {}ms", elapsed.as_millis());
    }

    pub fn query_timeout(kind: &str, target: &Target, limit: Duration) {
        warn!("{kind} query to {target} exceeded deadline (limit {limit:?})");
    }

    pub fn query_failed(kind: &str, target: &Target, err: &dyn Display) {
        error!("{kind} query to {target} failed: {err}");
    }

    pub fn icon_written(path: &Path, len: usize) {
        info!("Wrote {len} byte icon to {}", path.display());
    }

    pub fn sweep_finished(total: usize, online: usize) {
        info!("Sweep finished: {online}/{total} targets online");
    }
}
