use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use fleet_core::{AppConfig, FleetError};
use fleet_domain::{User, UserId, Vehicle};
use fleet_sync::{ErrorReporter, RetryHandle};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Data served by the in-memory providers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub users: Vec<User>,
    /// Picture URIs keyed by user id.
    #[serde(default)]
    pub images: HashMap<UserId, String>,
}

impl Fixture {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid fixture {}", path.display()))
    }

    /// Looks a user up in `users`, then among the drivers of each vehicle.
    pub fn find_user(&self, id: &str) -> Option<&User> {
        self.users
            .iter()
            .chain(self.vehicles.iter().flat_map(|v| v.users.iter()))
            .find(|user| user.id == id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportedError {
    pub message_key: String,
    pub error: String,
    pub retryable: bool,
}

/// Collects reported errors so the command can fail once it is done.
#[derive(Default)]
pub struct CliReporter {
    reports: Mutex<Vec<ReportedError>>,
}

impl CliReporter {
    pub fn take(&self) -> Vec<ReportedError> {
        std::mem::take(&mut *self.reports.lock())
    }
}

impl ErrorReporter for CliReporter {
    fn handle_unexpected_error(
        &self,
        error: &FleetError,
        message_key: &str,
        retry: Option<RetryHandle>,
    ) {
        tracing::debug!(message_key, "Recording reported error: {}", error);
        self.reports.lock().push(ReportedError {
            message_key: message_key.to_string(),
            error: error.to_string(),
            retryable: retry.is_some(),
        });
    }
}

pub struct CliContext {
    pub config: AppConfig,
    pub config_path: Option<PathBuf>,
    pub reporter: Arc<CliReporter>,
}

impl CliContext {
    /// An explicit config file must parse; the platform default falls back
    /// to built-in values.
    pub fn load(config: Option<PathBuf>, page_size: Option<usize>) -> anyhow::Result<Self> {
        let (mut app_config, config_path) = match config {
            Some(path) => (AppConfig::from_file(&path)?, Some(path)),
            None => (AppConfig::load(), AppConfig::config_path()),
        };
        if let Some(page_size) = page_size {
            app_config.page_size = page_size;
        }
        app_config.validate()?;

        Ok(Self {
            config: app_config,
            config_path,
            reporter: Arc::new(CliReporter::default()),
        })
    }

    /// Fails with the first reported error, if any.
    pub fn check_reports(&self) -> anyhow::Result<()> {
        match self.reporter.take().into_iter().next() {
            Some(report) => Err(anyhow::anyhow!("{}: {}", report.message_key, report.error)),
            None => Ok(()),
        }
    }
}
