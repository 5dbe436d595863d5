use anyhow::{Context, Result};
use logboss::config::LogbossConfig;
use logboss::highlight::TerminalDecorations;
use logboss::locator::Locator;
use logboss::selector::FileSelector;
use logboss::session::Session;
use logboss::state::{self, JsonStateStore};
use std::path::PathBuf;

use crate::cli::Cli;

pub type CliSession = Session<JsonStateStore, TerminalDecorations>;

pub struct LogbossContext {
    pub invocation: Cli,
    pub config: LogbossConfig,
}

impl LogbossContext {
    pub fn new(invocation: Cli, config: LogbossConfig) -> Self {
        Self { invocation, config }
    }

    pub fn state_dir(&self) -> Result<PathBuf> {
        match &self.invocation.state_dir {
            Some(dir) => Ok(dir.clone()),
            None => state::discover_state_dir().context("Failed to resolve .logboss directory"),
        }
    }

    pub fn store(&self) -> Result<JsonStateStore> {
        let dir = self.state_dir()?;
        JsonStateStore::open_dir(&dir)
            .with_context(|| format!("Failed to open state store in {}", dir.display()))
    }

    pub fn locator(&self) -> Result<Locator> {
        Locator::new(self.config.detection.policy()).context("Invalid detection policy")
    }

    pub fn selector(&self, cli_extensions: &[String]) -> FileSelector {
        self.config.files.selector(cli_extensions)
    }

    pub fn session(&self) -> Result<CliSession> {
        Ok(Session::new(
            self.locator()?,
            self.store()?,
            TerminalDecorations::new(),
        ))
    }
}
