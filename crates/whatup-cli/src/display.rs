//! Result rendering
//!
//! Every format writes to an arbitrary writer so output can be captured in
//! tests. Only the plain format prints warnings and the empty-input notices.

use console::{Alignment, measure_text_width, pad_str, style};
use serde::Serialize;
use std::io::{self, Write};
use whatup_core::{Outcome, Report, ResultRecord};

use crate::config::OutputFormat;
use crate::error::{CliError, Result};

const DEPRECATION_BANNER: &str = "WARNING: Charts marked as deprecated will not be shown in the results.";

/// Maximum width of a table cell before it wraps
pub const MAX_COLUMN_WIDTH: usize = 50;

const TABLE_HEADER: [&str; 6] = [
    "NAME",
    "NAMESPACE",
    "INSTALLED VERSION",
    "LATEST VERSION",
    "CHART",
    "REPOSITORY",
];

/// Renders the outcome of a run in one output format
pub struct ReportRenderer {
    writer: Box<dyn Write + Send>,
    format: OutputFormat,
    styled: bool,
}

impl ReportRenderer {
    /// Create a renderer that writes to stdout
    pub fn new(format: OutputFormat, styled: bool) -> Self {
        Self {
            writer: Box::new(io::stdout()),
            format,
            styled,
        }
    }

    /// Create a renderer that writes to a custom writer (for testing)
    pub fn with_writer<W: Write + Send + 'static>(format: OutputFormat, writer: W) -> Self {
        Self {
            writer: Box::new(writer),
            format,
            styled: false,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Render a whole run
    pub fn render(&mut self, outcome: &Outcome) -> Result<()> {
        match outcome {
            Outcome::NoReleases => self.notice("No releases found. All up to date!")?,
            Outcome::NoRepositories => {
                self.notice("No repositories found. Did you run `helm repo update`?")?
            }
            Outcome::Completed(report) => {
                if self.format.is_plain() {
                    self.render_warnings(report)?;
                }
                self.render_records(report)?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }

    fn notice(&mut self, message: &str) -> io::Result<()> {
        if self.format.is_plain() {
            writeln!(self.writer, "{}", message)?;
        }
        Ok(())
    }

    fn render_warnings(&mut self, report: &Report) -> io::Result<()> {
        if report.warnings.is_empty() {
            return Ok(());
        }
        writeln!(self.writer)?;
        for warning in &report.warnings {
            writeln!(self.writer, "WARNING: {}", warning)?;
        }
        Ok(())
    }

    /// Render the records of a completed run
    pub fn render_records(&mut self, report: &Report) -> Result<()> {
        match self.format {
            OutputFormat::Plain => self.render_plain(report)?,
            OutputFormat::Short => self.render_short(report)?,
            OutputFormat::Json => {
                let json = to_json(&report.records)?;
                writeln!(self.writer, "{}", json)?;
            }
            OutputFormat::Yaml => {
                let yaml = serde_yaml::to_string(&report.records)
                    .map_err(|e| CliError::output(format!("failed to serialize YAML: {}", e)))?;
                write!(self.writer, "{}", yaml)?;
            }
            OutputFormat::Table => self.render_table(report)?,
        }
        Ok(())
    }

    fn render_plain(&mut self, report: &Report) -> io::Result<()> {
        if !report.has_outdated() {
            return writeln!(self.writer, "No charts need updates. All up to date!");
        }

        writeln!(self.writer, "\n{}\n", DEPRECATION_BANNER)?;
        for record in &report.records {
            if record.is_outdated() {
                let release = if self.styled {
                    style(&record.release_name).yellow().bold().force_styling(true).to_string()
                } else {
                    record.release_name.clone()
                };
                writeln!(
                    self.writer,
                    "There is an update available for release {} ({})!",
                    release, record.chart_name
                )?;
                writeln!(self.writer, "Installed version: {}", record.installed_version)?;
                writeln!(self.writer, "Available version: {}\n", record.latest_version)?;
            } else {
                writeln!(
                    self.writer,
                    "Release {} ({}) is up to date.",
                    record.release_name, record.chart_name
                )?;
            }
        }
        writeln!(self.writer, "Done.")
    }

    fn render_short(&mut self, report: &Report) -> io::Result<()> {
        for record in report.outdated() {
            writeln!(
                self.writer,
                "{} ({}): {} --> {}",
                record.release_name, record.chart_name, record.installed_version, record.latest_version
            )?;
        }
        Ok(())
    }

    fn render_table(&mut self, report: &Report) -> io::Result<()> {
        writeln!(self.writer, "\n{}\n", DEPRECATION_BANNER)?;

        let mut table = Table::new(TABLE_HEADER);
        for record in report.outdated() {
            table.add_row(table_row(record));
        }
        writeln!(self.writer, "{}", table.render(self.styled))
    }
}

fn table_row(record: &ResultRecord) -> [&str; 6] {
    [
        record.release_name.as_str(),
        record.namespace.as_str(),
        record.installed_version.as_str(),
        record.latest_version.as_str(),
        record.chart_name.as_str(),
        record.repo_name.as_str(),
    ]
}

/// Serialize with four-space indentation
fn to_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| CliError::output(format!("failed to serialize JSON: {}", e)))?;
    String::from_utf8(buf).map_err(|e| CliError::output(e.to_string()))
}

/// Text table with a header row, wrapped cells and two-space column gaps
#[derive(Debug, Clone)]
pub struct Table {
    rows: Vec<Vec<String>>,
    max_width: usize,
}

impl Table {
    pub fn new<const N: usize>(header: [&str; N]) -> Self {
        Self {
            rows: vec![header.iter().map(|h| h.to_string()).collect()],
            max_width: MAX_COLUMN_WIDTH,
        }
    }

    #[cfg(test)]
    pub fn with_max_width(mut self, max_width: usize) -> Self {
        self.max_width = max_width.max(1);
        self
    }

    pub fn add_row<const N: usize>(&mut self, cells: [&str; N]) {
        self.rows.push(cells.iter().map(|c| c.to_string()).collect());
    }

    /// Render all rows, bolding the header when `styled`.
    ///
    /// Lines carry no trailing whitespace and no final newline.
    pub fn render(&self, styled: bool) -> String {
        let wrapped: Vec<Vec<Vec<String>>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|cell| wrap_cell(cell, self.max_width)).collect())
            .collect();

        let columns = wrapped.iter().map(Vec::len).max().unwrap_or(0);
        let widths: Vec<usize> = (0..columns)
            .map(|col| {
                wrapped
                    .iter()
                    .filter_map(|row| row.get(col))
                    .flatten()
                    .map(|line| measure_text_width(line))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut lines = Vec::new();
        for (index, row) in wrapped.iter().enumerate() {
            let height = row.iter().map(Vec::len).max().unwrap_or(1);
            for line_no in 0..height {
                let cells: Vec<String> = row
                    .iter()
                    .zip(&widths)
                    .map(|(cell, width)| {
                        let text = cell.get(line_no).map(String::as_str).unwrap_or("");
                        let padded = pad_str(text, *width, Alignment::Left, None).into_owned();
                        if styled && index == 0 {
                            style(padded).bold().force_styling(true).to_string()
                        } else {
                            padded
                        }
                    })
                    .collect();
                lines.push(cells.join("  ").trim_end().to_string());
            }
        }
        lines.join("\n")
    }
}

/// Wrap text at word boundaries, hard-splitting words longer than `width`
fn wrap_cell(text: &str, width: usize) -> Vec<String> {
    if measure_text_width(text) <= width {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for piece in chars.chunks(width) {
            let piece: String = piece.iter().collect();
            let current_width = measure_text_width(&current);
            if !current.is_empty() && current_width + 1 + piece.chars().count() > width {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&piece);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
