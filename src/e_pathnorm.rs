use std::path::{Path, MAIN_SEPARATOR};

/// Strips the working directory from paths before they are written to the report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathNormalizer {
    prefix: String,
}

impl PathNormalizer {
    /// Builds a normalizer for `working_dir`. The stored prefix always ends with
    /// a path separator so that `C:\src` never matches `C:\src2\a.csproj`.
    /// An empty working directory gives a normalizer that returns paths unchanged.
    pub fn new(working_dir: &Path) -> Self {
        let mut prefix = working_dir.to_string_lossy().into_owned();
        if !prefix.is_empty() && !prefix.ends_with(['/', '\\']) {
            prefix.push(MAIN_SEPARATOR);
        }
        PathNormalizer { prefix }
    }

    /// Normalizer that strips nothing.
    pub fn identity() -> Self {
        PathNormalizer::default()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns `path` without the common prefix, or `path` itself when it lies elsewhere.
    pub fn normalize<'a>(&self, path: &'a str) -> &'a str {
        if self.prefix.is_empty() {
            return path;
        }
        path.strip_prefix(self.prefix.as_str()).unwrap_or(path)
    }

    /// Normalizes `path` and splits it into `(dir, name)`.
    ///
    /// Both `/` and `\` count as separators since build engines on Windows report
    /// backslash paths regardless of where the report is produced.
    pub fn split<'a>(&self, path: &'a str) -> (&'a str, &'a str) {
        let normalized = self.normalize(path);
        match normalized.rfind(['/', '\\']) {
            Some(idx) => (&normalized[..idx], &normalized[idx + 1..]),
            None => ("", normalized),
        }
    }
}
