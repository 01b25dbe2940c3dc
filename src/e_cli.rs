use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::e_config::{load_config_file, parse_logger_parameters, LoggerConfig, ReportSettings};
use crate::e_types::Verbosity;

#[derive(Parser, Debug)]
#[command(author, version, about = "Aggregate build events into a single XML build report.", long_about = None)]
pub struct Cli {
    #[arg(
        long,
        short = 'e',
        default_value = "-",
        help = "JSON-lines event stream to read, or `-` for stdin."
    )]
    pub events: String,

    #[arg(
        long,
        short = 'o',
        help = "Report file to write. (default: msbuild.xml)"
    )]
    pub logfile: Option<PathBuf>,

    #[arg(
        long,
        short = 'v',
        help = "Verbosity: quiet, minimal, normal, detailed or diagnostic. (default: normal)"
    )]
    pub verbosity: Option<Verbosity>,

    #[arg(
        long,
        short = 'p',
        help = "Logger parameters, e.g. `LogFile=build.xml;Verbosity=detailed`."
    )]
    pub parameters: Option<String>,

    #[arg(long, help = "TOML file with a [report] table (logfile, verbosity).")]
    pub config: Option<PathBuf>,

    #[arg(
        long = "working-dir",
        help = "Prefix stripped from reported paths. (default: current directory)"
    )]
    pub working_dir: Option<PathBuf>,
}

impl Cli {
    /// Resolves the logger configuration. Explicit flags win over the parameter
    /// string, which wins over the config file.
    pub fn logger_config(&self) -> Result<LoggerConfig> {
        let flags = ReportSettings {
            logfile: self.logfile.clone(),
            verbosity: self.verbosity,
        };
        let parameters = match &self.parameters {
            Some(p) => parse_logger_parameters(p)?,
            None => ReportSettings::default(),
        };
        let file = match &self.config {
            Some(path) => load_config_file(path)?,
            None => ReportSettings::default(),
        };

        let mut config = LoggerConfig {
            working_dir: self.working_dir.clone(),
            ..LoggerConfig::default()
        };
        flags.or(parameters).or(file).apply_to(&mut config);
        Ok(config)
    }
}
