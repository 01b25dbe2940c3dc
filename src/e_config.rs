use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::debug;
use serde::Deserialize;

use crate::e_types::Verbosity;

/// Report file written when nothing else is configured.
pub const DEFAULT_LOGFILE: &str = "msbuild.xml";

/// Resolved logger settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub logfile: PathBuf,
    pub verbosity: Verbosity,
    /// Prefix stripped from reported paths. `None` captures the process
    /// working directory when the logger is initialized.
    pub working_dir: Option<PathBuf>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        LoggerConfig {
            logfile: PathBuf::from(DEFAULT_LOGFILE),
            verbosity: Verbosity::default(),
            working_dir: None,
        }
    }
}

/// Settings that may be left unspecified by one configuration source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportSettings {
    pub logfile: Option<PathBuf>,
    pub verbosity: Option<Verbosity>,
}

impl ReportSettings {
    /// Fills the fields of `self` that are still unset from `fallback`.
    pub fn or(self, fallback: ReportSettings) -> ReportSettings {
        ReportSettings {
            logfile: self.logfile.or(fallback.logfile),
            verbosity: self.verbosity.or(fallback.verbosity),
        }
    }

    pub fn apply_to(self, config: &mut LoggerConfig) {
        if let Some(logfile) = self.logfile {
            config.logfile = logfile;
        }
        if let Some(verbosity) = self.verbosity {
            config.verbosity = verbosity;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    report: ReportSettings,
}

/// Parses a logger parameter string such as `LogFile=build.xml;Verbosity=detailed`.
///
/// Keys are case-insensitive and empty segments are ignored.
pub fn parse_logger_parameters(parameters: &str) -> Result<ReportSettings> {
    let mut settings = ReportSettings::default();
    for segment in parameters.split(';') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let Some((key, value)) = segment.split_once('=') else {
            bail!("logger parameter `{}` is not of the form key=value", segment);
        };
        let value = value.trim();
        match key.trim().to_ascii_lowercase().as_str() {
            "logfile" => {
                if value.is_empty() {
                    bail!("logger parameter `LogFile` must not be empty");
                }
                settings.logfile = Some(PathBuf::from(value));
            }
            "verbosity" => settings.verbosity = Some(value.parse()?),
            other => bail!("unknown logger parameter `{}`", other),
        }
    }
    debug!("logger parameters {:?} -> {:?}", parameters, settings);
    Ok(settings)
}

/// Reads the `[report]` table of a TOML configuration file.
pub fn load_config_file(path: &Path) -> Result<ReportSettings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let parsed: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(parsed.report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_logger_parameters() {
        let settings = parse_logger_parameters("LogFile=out/build.xml; verbosity = d ;").unwrap();
        assert_eq!(settings.logfile, Some(PathBuf::from("out/build.xml")));
        assert_eq!(settings.verbosity, Some(Verbosity::Detailed));
        assert_eq!(parse_logger_parameters("").unwrap(), ReportSettings::default());
    }

    #[test]
    fn test_parse_logger_parameters_rejects_garbage() {
        assert!(parse_logger_parameters("logfile").is_err());
        assert!(parse_logger_parameters("color=red").is_err());
        assert!(parse_logger_parameters("verbosity=chatty").is_err());
        assert!(parse_logger_parameters("logfile=").is_err());
    }

    #[test]
    fn test_settings_precedence() {
        let cli = ReportSettings {
            logfile: None,
            verbosity: Some(Verbosity::Quiet),
        };
        let params = ReportSettings {
            logfile: Some(PathBuf::from("params.xml")),
            verbosity: Some(Verbosity::Diagnostic),
        };
        let mut config = LoggerConfig::default();
        cli.or(params).apply_to(&mut config);
        assert_eq!(config.logfile, PathBuf::from("params.xml"));
        assert_eq!(config.verbosity, Verbosity::Quiet);
    }

    #[test]
    fn test_load_config_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("buildlog.toml");
        fs::write(&path, "[report]\nlogfile = \"report.xml\"\nverbosity = \"minimal\"\n")?;
        let settings = load_config_file(&path)?;
        assert_eq!(settings.logfile, Some(PathBuf::from("report.xml")));
        assert_eq!(settings.verbosity, Some(Verbosity::Minimal));

        fs::write(&path, "[report]\nverbosity = \"shouty\"\n")?;
        assert!(load_config_file(&path).is_err());
        assert!(load_config_file(&dir.path().join("missing.toml")).is_err());
        Ok(())
    }

    #[test]
    fn test_defaults() {
        let config = LoggerConfig::default();
        assert_eq!(config.logfile, PathBuf::from(DEFAULT_LOGFILE));
        assert_eq!(config.verbosity, Verbosity::Normal);
        assert_eq!(config.working_dir, None);
    }
}
