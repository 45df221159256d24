//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use procure_data::{FetchClient, ProcureGateway, ReqwestTransport};
use procure_observability::{LogLevel, StructuredLogger};
use procure_ui::{ProcureApp, ResetPolicy};

use crate::config::{CliConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration, with environment overrides applied.
    pub config: CliConfig,
    /// File the config was read from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Structured logger for component diagnostics (stderr).
    pub logger: StructuredLogger,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => (CliConfig::load(path)?, Some(PathBuf::from(path))),
            None => match Self::find_config(&cwd)? {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            },
        };
        let config = config.with_env_overrides();

        let level = if output.is_verbose() {
            LogLevel::Debug
        } else {
            config.log.level().unwrap_or(LogLevel::Warn)
        };
        let mut logger = StructuredLogger::new().with_min_level(level);
        if let Some(format) = config.log.format() {
            logger = logger.with_format(format);
        }

        Ok(Self {
            config,
            config_path,
            output,
            logger,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Result<Option<(CliConfig, PathBuf)>> {
        let mut current = start.to_path_buf();
        loop {
            for name in CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    let config = CliConfig::load(&config_path.to_string_lossy())?;
                    return Ok(Some((config, config_path)));
                }
            }

            if !current.pop() {
                return Ok(None);
            }
        }
    }

    /// Gateway over a real HTTP transport with the configured deadline.
    pub fn gateway(&self) -> ProcureGateway {
        let client = FetchClient::with_transport(Arc::new(ReqwestTransport::new()))
            .with_default_header("Accept", "application/json")
            .with_timeout(self.config.timeout());
        ProcureGateway::new(client, self.config.endpoints.clone()).with_logger(self.logger.clone())
    }

    /// Full client app wired to the configured endpoints.
    pub fn app(&self) -> ProcureApp {
        ProcureApp::with_logger(self.gateway(), self.logger.clone())
            .with_reset_policy(self.reset_policy())
    }

    pub fn reset_policy(&self) -> ResetPolicy {
        self.config.form.reset_policy().unwrap_or_default()
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}
