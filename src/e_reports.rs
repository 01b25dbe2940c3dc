use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tempfile::NamedTempFile;

use crate::e_aggregator::AggregatedBuild;
use crate::e_fmt::xml_safe;
use crate::e_pathnorm::PathNormalizer;
use crate::e_types::{Diagnostic, Project, Verbosity};

/// Report-wide totals, returned after the document is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub project_count: usize,
    pub warning_count: usize,
    pub error_count: usize,
}

impl ReportSummary {
    pub fn from_projects(projects: &[Project]) -> Self {
        ReportSummary {
            project_count: projects.len(),
            warning_count: projects.iter().map(Project::warning_count).sum(),
            error_count: projects.iter().map(Project::error_count).sum(),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

/// Order in which projects appear in the report.
///
/// A failed build keeps creation order. Otherwise the noisiest projects come first;
/// the sort is stable so ties keep creation order.
pub fn report_order(projects: &[Project], build_has_errors: bool) -> Vec<&Project> {
    let mut ordered: Vec<&Project> = projects.iter().collect();
    if !build_has_errors {
        ordered.sort_by(|a, b| b.warning_count().cmp(&a.warning_count()));
    }
    ordered
}

/// Whether a project gets an element of its own. Projects with errors or warnings
/// are always listed; empty ones only above quiet.
pub fn should_emit(project: &Project, verbosity: Verbosity) -> bool {
    verbosity > Verbosity::Quiet || project.error_count() > 0 || project.warning_count() > 0
}

pub struct Reporter<'a> {
    build: &'a AggregatedBuild,
    verbosity: Verbosity,
    normalizer: &'a PathNormalizer,
}

impl<'a> Reporter<'a> {
    pub fn new(
        build: &'a AggregatedBuild,
        verbosity: Verbosity,
        normalizer: &'a PathNormalizer,
    ) -> Self {
        Reporter {
            build,
            verbosity,
            normalizer,
        }
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary::from_projects(&self.build.projects)
    }

    /// Writes the complete document to `sink`.
    pub fn write_to<W: Write>(&self, sink: W) -> Result<ReportSummary> {
        let mut writer = if self.verbosity.pretty_prints() {
            Writer::new_with_indent(sink, b' ', 2)
        } else {
            Writer::new(sink)
        };
        let summary = self.summary();

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let mut root = BytesStart::new("msbuild");
        if let Some(solution) = self.build.solution.as_deref() {
            let (dir, name) = self.normalizer.split(solution);
            root.push_attribute(("solution_name", &*xml_safe(name)));
            root.push_attribute(("solution_dir", &*xml_safe(dir)));
        }
        root.push_attribute(("project_count", summary.project_count.to_string().as_str()));
        root.push_attribute(("warning_count", summary.warning_count.to_string().as_str()));
        root.push_attribute(("error_count", summary.error_count.to_string().as_str()));
        writer.write_event(Event::Start(root))?;

        let build_has_errors = summary.has_errors();
        for project in report_order(&self.build.projects, build_has_errors) {
            if !should_emit(project, self.verbosity) {
                debug!("skipping empty project {}", project.path);
                continue;
            }
            self.write_project(&mut writer, project, build_has_errors)?;
        }

        writer.write_event(Event::End(BytesEnd::new("msbuild")))?;
        writer
            .get_mut()
            .flush()
            .context("Failed to flush build report")?;
        Ok(summary)
    }

    fn write_project<W: Write>(
        &self,
        writer: &mut Writer<W>,
        project: &Project,
        build_has_errors: bool,
    ) -> Result<()> {
        let (dir, name) = self.normalizer.split(&project.path);
        let mut start = BytesStart::new("project");
        start.push_attribute(("dir", &*xml_safe(dir)));
        start.push_attribute(("name", &*xml_safe(name)));

        // warnings are dropped from a failed build's report
        let has_children = project.error_count() > 0
            || (!build_has_errors && project.warning_count() > 0)
            || project.message_count() > 0;
        if !has_children {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        for error in &project.errors {
            self.write_diagnostic(writer, "error", error)?;
        }
        if !build_has_errors {
            for warning in &project.warnings {
                self.write_diagnostic(writer, "warning", warning)?;
            }
        }
        for message in &project.messages {
            let mut start = BytesStart::new("message");
            start.push_attribute(("importance", message.importance.as_str()));
            writer.write_event(Event::Start(start))?;
            writer.write_event(Event::Text(BytesText::new(&xml_safe(&message.text))))?;
            writer.write_event(Event::End(BytesEnd::new("message")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("project")))?;
        Ok(())
    }

    fn write_diagnostic<W: Write>(
        &self,
        writer: &mut Writer<W>,
        tag: &str,
        diagnostic: &Diagnostic,
    ) -> Result<()> {
        let mut element = BytesStart::new(tag);
        element.push_attribute(("code", &*xml_safe(&diagnostic.code)));
        element.push_attribute(("message", &*xml_safe(&diagnostic.text)));
        if let Some(file) = diagnostic.file.as_deref() {
            let (dir, name) = self.normalizer.split(file);
            element.push_attribute(("dir", &*xml_safe(dir)));
            element.push_attribute(("name", &*xml_safe(name)));
            element.push_attribute(("pos", diagnostic.position().as_str()));
        }
        writer.write_event(Event::Empty(element))?;
        Ok(())
    }

    /// Renders the document into a `String`.
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        String::from_utf8(buffer).context("Build report is not valid UTF-8")
    }

    /// Writes the document to `file_path`. Nothing at `file_path` changes unless
    /// the whole document was written.
    pub fn save_to_file(&self, file_path: &Path) -> Result<ReportSummary> {
        let summary = persist_report(file_path, |file| self.write_to(BufWriter::new(file)))?;
        info!(
            "wrote {} ({} projects, {} errors, {} warnings)",
            file_path.display(),
            summary.project_count,
            summary.error_count,
            summary.warning_count
        );
        Ok(summary)
    }
}

/// Runs `write` against a temporary file next to `file_path` and moves it into
/// place only when `write` succeeds. On failure the temporary file is removed.
pub fn persist_report<T, F>(file_path: &Path, write: F) -> Result<T>
where
    F: FnOnce(&mut File) -> Result<T>,
{
    let dir = match file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create report file {}", file_path.display()))?;
    let value = write(temp.as_file_mut())
        .with_context(|| format!("Failed to write report file {}", file_path.display()))?;
    temp.persist(file_path)
        .with_context(|| format!("Failed to replace report file {}", file_path.display()))?;
    Ok(value)
}
