//! Routes build events into per-project buckets.
//!
//! Build engines report nested `ProjectStarted`/`ProjectFinished` pairs for
//! multi-project and multi-target builds. Each start pushes the project onto a
//! scope stack and each finish pops it, so a diagnostic is always attributed to
//! the innermost project that is open when it arrives.

use std::collections::HashMap;

use log::{debug, trace, warn};

use crate::e_types::{Diagnostic, Importance, Message, Project, Verbosity};

/// Name of the bucket that collects events raised outside any project scope.
pub const ROOT_PROJECT: &str = "MSBuild";

const SOLUTION_SUFFIX: &str = ".sln";
const PROJECT_SUFFIX: &str = "proj";

fn has_suffix(path: &str, suffix: &str) -> bool {
    path.len() >= suffix.len()
        && path
            .get(path.len() - suffix.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
}

pub fn is_solution_file(path: &str) -> bool {
    has_suffix(path, SOLUTION_SUFFIX)
}

pub fn is_project_file(path: &str) -> bool {
    has_suffix(path, PROJECT_SUFFIX)
}

/// What the reporter needs once the build is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedBuild {
    /// Buckets in creation order.
    pub projects: Vec<Project>,
    pub solution: Option<String>,
}

#[derive(Debug)]
pub struct Aggregator {
    projects: Vec<Project>,
    by_path: HashMap<String, usize>,
    scope: Vec<usize>,
    solution: Option<String>,
    threshold: Option<Importance>,
}

impl Aggregator {
    /// Creates an aggregator that keeps messages at least as important as `threshold`.
    /// `None` drops every message.
    pub fn new(threshold: Option<Importance>) -> Self {
        Aggregator {
            projects: Vec::new(),
            by_path: HashMap::new(),
            scope: Vec::new(),
            solution: None,
            threshold,
        }
    }

    pub fn for_verbosity(verbosity: Verbosity) -> Self {
        Aggregator::new(verbosity.importance_threshold())
    }

    pub fn threshold(&self) -> Option<Importance> {
        self.threshold
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn solution(&self) -> Option<&str> {
        self.solution.as_deref()
    }

    /// Number of project scopes currently open.
    pub fn depth(&self) -> usize {
        self.scope.len()
    }

    /// The project that receives the next diagnostic, if any scope is open.
    pub fn current(&self) -> Option<&Project> {
        self.scope.last().map(|&idx| &self.projects[idx])
    }

    pub fn project(&self, path: &str) -> Option<&Project> {
        self.by_path.get(path).map(|&idx| &self.projects[idx])
    }

    fn bucket(&mut self, path: &str) -> usize {
        if let Some(&idx) = self.by_path.get(path) {
            return idx;
        }
        let idx = self.projects.len();
        debug!("new project bucket #{}: {}", idx, path);
        self.projects.push(Project::new(path));
        self.by_path.insert(path.to_string(), idx);
        idx
    }

    fn current_bucket(&mut self) -> usize {
        match self.scope.last() {
            Some(&idx) => idx,
            None => self.bucket(ROOT_PROJECT),
        }
    }

    /// A solution path always replaces what was recorded before; a project path is
    /// only recorded while nothing is.
    fn track_solution(&mut self, path: &str) {
        if is_solution_file(path) {
            self.solution = Some(path.to_string());
        } else if self.solution.is_none() && is_project_file(path) {
            self.solution = Some(path.to_string());
        }
    }

    pub fn on_project_started(&mut self, path: &str) {
        self.track_solution(path);
        // the solution itself is the top-level orchestration scope
        let key = if is_solution_file(path) {
            ROOT_PROJECT
        } else {
            path
        };
        let idx = self.bucket(key);
        self.scope.push(idx);
        trace!("project started: {} (depth {})", path, self.scope.len());
    }

    /// Closes the innermost project scope.
    ///
    /// # Panics
    ///
    /// Panics when no scope is open: a finish without a matching start means the
    /// event stream is malformed.
    pub fn on_project_finished(&mut self) {
        match self.scope.pop() {
            Some(idx) => trace!(
                "project finished: {} (depth {})",
                self.projects[idx].path,
                self.scope.len()
            ),
            None => panic!("project finished event without a matching project started event"),
        }
    }

    pub fn on_error(&mut self, code: &str, text: &str, file: &str, line: u32, column: u32) {
        let idx = self.current_bucket();
        self.projects[idx]
            .errors
            .push(Diagnostic::new(code, text, file, line, column));
    }

    pub fn on_warning(&mut self, code: &str, text: &str, file: &str, line: u32, column: u32) {
        let idx = self.current_bucket();
        self.projects[idx]
            .warnings
            .push(Diagnostic::new(code, text, file, line, column));
    }

    pub fn on_message(&mut self, text: &str, importance: Importance) {
        match self.threshold {
            Some(threshold) if importance <= threshold => {}
            _ => return,
        }
        let idx = self.current_bucket();
        self.projects[idx].messages.push(Message {
            text: text.to_string(),
            importance,
        });
    }

    /// Ends aggregation and hands the buckets over for reporting.
    pub fn finish(self) -> AggregatedBuild {
        if !self.scope.is_empty() {
            warn!(
                "build ended with {} project scope(s) still open",
                self.scope.len()
            );
        }
        AggregatedBuild {
            projects: self.projects,
            solution: self.solution,
        }
    }
}
