#![doc = include_str!("../README.md")]

// Re-export common modules
pub mod prelude {
    pub use std::env;
    pub use std::fs;
    pub use std::io;
    pub use std::path::{Path, PathBuf};
    pub use std::process::exit;

    pub use log::{debug, error, info, log_enabled, Level};
}

pub mod e_aggregator;
pub use e_aggregator::{AggregatedBuild, Aggregator, ROOT_PROJECT};
pub mod e_cli;
pub use e_cli::Cli;
pub mod e_config;
pub use e_config::LoggerConfig;
pub mod e_fmt;
pub mod e_eventdispatcher;
pub use e_eventdispatcher::{BuildEvent, EventDispatcher};
pub mod e_logger;
pub use e_logger::XmlLogger;
pub mod e_parser;
pub use e_parser::parse_events;
pub mod e_pathnorm;
pub use e_pathnorm::PathNormalizer;
pub mod e_reports;
pub use e_reports::{ReportSummary, Reporter};
pub mod e_types;
pub use e_types::{Diagnostic, Importance, Message, Project, Verbosity};
