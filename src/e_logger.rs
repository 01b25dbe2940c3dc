//! Logger lifecycle: initialize once, receive events, write the report on shutdown.

use std::env;

use anyhow::{Context, Result};
use log::debug;

use crate::e_aggregator::Aggregator;
use crate::e_config::LoggerConfig;
use crate::e_eventdispatcher::BuildEvent;
use crate::e_pathnorm::PathNormalizer;
use crate::e_reports::{ReportSummary, Reporter};
use crate::e_types::Importance;

pub struct XmlLogger {
    config: LoggerConfig,
    normalizer: PathNormalizer,
    aggregator: Aggregator,
}

impl XmlLogger {
    /// Captures the working directory used as the common path prefix.
    pub fn initialize(config: LoggerConfig) -> Result<Self> {
        let working_dir = match &config.working_dir {
            Some(dir) => dir.clone(),
            None => env::current_dir().context("Failed to determine the working directory")?,
        };
        let normalizer = PathNormalizer::new(&working_dir);
        let aggregator = Aggregator::for_verbosity(config.verbosity);
        debug!(
            "xml logger: logfile={} verbosity={} prefix={:?}",
            config.logfile.display(),
            config.verbosity,
            normalizer.prefix()
        );
        Ok(XmlLogger {
            config,
            normalizer,
            aggregator,
        })
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn handle(&mut self, event: &BuildEvent) {
        event.apply(&mut self.aggregator);
    }

    pub fn project_started(&mut self, path: &str) {
        self.aggregator.on_project_started(path);
    }

    pub fn project_finished(&mut self) {
        self.aggregator.on_project_finished();
    }

    pub fn error(&mut self, code: &str, text: &str, file: &str, line: u32, column: u32) {
        self.aggregator.on_error(code, text, file, line, column);
    }

    pub fn warning(&mut self, code: &str, text: &str, file: &str, line: u32, column: u32) {
        self.aggregator.on_warning(code, text, file, line, column);
    }

    pub fn message(&mut self, text: &str, importance: Importance) {
        self.aggregator.on_message(text, importance);
    }

    /// Writes the report to the configured file. Consumes the logger, so no
    /// event can arrive after the report exists.
    pub fn shutdown(self) -> Result<ReportSummary> {
        let build = self.aggregator.finish();
        Reporter::new(&build, self.config.verbosity, &self.normalizer)
            .save_to_file(&self.config.logfile)
    }
}
