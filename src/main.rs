//! # buildlog-xml
//!
//! Reads a stream of build lifecycle events and writes a single XML report
//! with per-project errors, warnings and messages.
//!
//! ## Quick Start
//! ```sh
//! buildlog-xml --events build-events.jsonl --logfile msbuild.xml --verbosity detailed
//! ```

use std::io::BufReader;

use anyhow::Context;
use buildlog_xml::e_parser::for_each_event;
use buildlog_xml::prelude::*;
use buildlog_xml::{Cli, XmlLogger};
use clap::Parser;

pub fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();

    let cli = Cli::parse();
    let config = cli.logger_config()?;
    let mut logger = XmlLogger::initialize(config)?;

    let read = if cli.events == "-" {
        let stdin = io::stdin();
        for_each_event(stdin.lock(), |event| logger.handle(&event))?
    } else {
        let file = fs::File::open(&cli.events)
            .with_context(|| format!("Failed to open event stream {}", cli.events))?;
        for_each_event(BufReader::new(file), |event| logger.handle(&event))?
    };
    debug!("read {} events", read);

    let logfile = logger.config().logfile.clone();
    let summary = logger.shutdown()?;
    info!(
        "{}: {} projects, {} errors, {} warnings",
        logfile.display(),
        summary.project_count,
        summary.error_count,
        summary.warning_count
    );
    Ok(())
}
