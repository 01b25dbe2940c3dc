use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Importance of a build message.
///
/// Variants are ordered from most to least important, so `High < Normal < Low`.
/// A message passes a threshold when `importance <= threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Normal,
    Low,
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::High => "high",
            Importance::Normal => "normal",
            Importance::Low => "low",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output detail level, ordered `Quiet < Minimal < Normal < Detailed < Diagnostic`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum Verbosity {
    Quiet,
    Minimal,
    #[default]
    Normal,
    Detailed,
    Diagnostic,
}

impl Verbosity {
    /// The least important message still collected at this verbosity.
    /// `None` means messages are not collected at all.
    pub fn importance_threshold(&self) -> Option<Importance> {
        match self {
            Verbosity::Quiet | Verbosity::Minimal => None,
            Verbosity::Normal => Some(Importance::High),
            Verbosity::Detailed => Some(Importance::Normal),
            Verbosity::Diagnostic => Some(Importance::Low),
        }
    }

    /// Whether the written document is indented.
    pub fn pretty_prints(&self) -> bool {
        *self > Verbosity::Minimal
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Minimal => "minimal",
            Verbosity::Normal => "normal",
            Verbosity::Detailed => "detailed",
            Verbosity::Diagnostic => "diagnostic",
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verbosity {
    type Err = anyhow::Error;

    /// Accepts the long names and the MSBuild short forms (`q`, `m`, `n`, `d`, `diag`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "q" | "quiet" => Ok(Verbosity::Quiet),
            "m" | "minimal" => Ok(Verbosity::Minimal),
            "n" | "normal" => Ok(Verbosity::Normal),
            "d" | "detailed" => Ok(Verbosity::Detailed),
            "diag" | "diagnostic" => Ok(Verbosity::Diagnostic),
            other => anyhow::bail!(
                "unknown verbosity `{}` (expected quiet, minimal, normal, detailed or diagnostic)",
                other
            ),
        }
    }
}

impl TryFrom<String> for Verbosity {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Verbosity> for String {
    fn from(value: Verbosity) -> Self {
        value.as_str().to_string()
    }
}

/// An error or warning raised during the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: String,
    pub text: String,
    /// `None` when the build engine reported no location (an empty string upstream).
    pub file: Option<String>,
    pub line: u32,
    pub column: u32,
}

impl Diagnostic {
    pub fn new(code: &str, text: &str, file: &str, line: u32, column: u32) -> Self {
        Diagnostic {
            code: code.to_string(),
            text: text.to_string(),
            file: if file.is_empty() {
                None
            } else {
                Some(file.to_string())
            },
            line,
            column,
        }
    }

    /// Position rendered as `(line, column)`.
    pub fn position(&self) -> String {
        format!("({}, {})", self.line, self.column)
    }
}

/// A low-level build message that survived importance filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub importance: Importance,
}

/// Everything collected for one project file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub path: String,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    pub messages: Vec<Message>,
}

impl Project {
    pub fn new(path: impl Into<String>) -> Self {
        Project {
            path: path.into(),
            errors: Vec::new(),
            warnings: Vec::new(),
            messages: Vec::new(),
        }
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}
