//! Output rendering and formatting

use banker_safety::SafetyReport;
use banker_state::{SystemState, Violation};
use banker_types::{ColorChoice, Matrix, OutputFormat, ProcessId, ResourceId};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use console::{Style, Term};
use serde::Serialize;
use std::io;

/// One evaluated state file
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub file: String,
    pub processes: usize,
    pub resources: usize,
    pub report: SafetyReport,
}

/// `show` payload for JSON output
#[derive(Serialize)]
struct ShowOutput<'a> {
    file: &'a str,
    state: &'a SystemState,
    report: &'a SafetyReport,
    violations: &'a [Violation],
}

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Selected output format
    format: OutputFormat,
    /// Color configuration
    color_choice: ColorChoice,
    /// Terminal instance
    term: Term,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(format: OutputFormat, color_choice: ColorChoice) -> Self {
        Self {
            format,
            color_choice,
            term: Term::stdout(),
        }
    }

    /// Render the verdicts of a `check` run
    pub fn render_check(&self, evaluations: &[Evaluation]) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(evaluations).map_err(io::Error::other)?;
                println!("{json}");
            }
            OutputFormat::Plain => {
                for evaluation in evaluations {
                    println!(
                        "{}: {}",
                        evaluation.file,
                        self.verdict_line(&evaluation.report)
                    );
                }
            }
            OutputFormat::Tty => self.render_check_table(evaluations),
        }
        Ok(())
    }

    /// Render a loaded state followed by its verdict
    pub fn render_show(
        &self,
        file: &str,
        state: &SystemState,
        report: &SafetyReport,
        violations: &[Violation],
    ) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                let output = ShowOutput {
                    file,
                    state,
                    report,
                    violations,
                };
                let json = serde_json::to_string_pretty(&output).map_err(io::Error::other)?;
                println!("{json}");
            }
            OutputFormat::Plain => {
                print!("{state}");
                self.print_violations(violations);
                println!("{}", self.verdict_line(report));
            }
            OutputFormat::Tty => {
                println!("{}", self.style_heading(file));
                println!();
                self.print_matrix("Claim matrix C", state.claim());
                self.print_matrix("Allocation matrix A", state.allocation());
                self.print_matrix("Need matrix C-A", state.need());
                self.print_vectors(state.resource_total(), state.resource_available());
                self.print_violations(violations);
                println!("{}", self.verdict_line(report));
            }
        }
        Ok(())
    }

    fn render_check_table(&self, evaluations: &[Evaluation]) {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec![
            Cell::new("File").add_attribute(Attribute::Bold),
            Cell::new("Processes").add_attribute(Attribute::Bold),
            Cell::new("Resources").add_attribute(Attribute::Bold),
            Cell::new("Verdict").add_attribute(Attribute::Bold),
            Cell::new("Sequence / Blocked").add_attribute(Attribute::Bold),
        ]);

        for evaluation in evaluations {
            let report = &evaluation.report;
            let detail = if report.safe {
                join_ids(&report.completion_order)
            } else {
                join_ids(&report.blocked)
            };
            table.add_row(vec![
                Cell::new(&evaluation.file),
                Cell::new(evaluation.processes),
                Cell::new(evaluation.resources),
                self.verdict_cell(report.safe),
                Cell::new(detail),
            ]);
        }

        println!("{table}");
    }

    fn print_matrix(&self, title: &str, matrix: &Matrix) {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);

        let mut header = vec![Cell::new("").add_attribute(Attribute::Bold)];
        header.extend(resource_header(matrix.cols()));
        table.set_header(header);

        for (process, row) in matrix.iter_rows().enumerate() {
            let mut cells =
                vec![Cell::new(ProcessId::new(process)).add_attribute(Attribute::Bold)];
            cells.extend(row.iter().map(|value| self.value_cell(*value)));
            table.add_row(cells);
        }

        println!("{}", self.style_heading(title));
        println!("{table}");
        println!();
    }

    fn print_vectors(&self, total: &[i64], available: &[i64]) {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);

        let mut header = vec![Cell::new("").add_attribute(Attribute::Bold)];
        header.extend(resource_header(total.len()));
        table.set_header(header);

        for (label, values) in [("Total R", total), ("Available V", available)] {
            let mut cells = vec![Cell::new(label).add_attribute(Attribute::Bold)];
            cells.extend(values.iter().map(|value| self.value_cell(*value)));
            table.add_row(cells);
        }

        println!("{}", self.style_heading("Resource vectors"));
        println!("{table}");
        println!();
    }

    fn print_violations(&self, violations: &[Violation]) {
        if violations.is_empty() {
            return;
        }
        println!("Consistency warnings ({}):", violations.len());
        for violation in violations {
            println!("  - {violation}");
        }
        println!();
    }

    fn verdict_line(&self, report: &SafetyReport) -> String {
        if report.safe {
            let text = format!("SAFE (sequence: {})", join_ids(&report.completion_order));
            self.style(Style::new().green().bold(), &text)
        } else {
            let text = format!(
                "UNSAFE ({} of {} completed, blocked: {})",
                report.completed_count(),
                report.completed_count() + report.blocked.len(),
                join_ids(&report.blocked)
            );
            self.style(Style::new().red().bold(), &text)
        }
    }

    fn verdict_cell(&self, safe: bool) -> Cell {
        let (text, color) = if safe {
            ("Safe", Color::Green)
        } else {
            ("Unsafe", Color::Red)
        };
        if self.supports_color() {
            Cell::new(text).fg(color)
        } else {
            Cell::new(text)
        }
    }

    fn value_cell(&self, value: i64) -> Cell {
        if value < 0 && self.supports_color() {
            Cell::new(value).fg(Color::Yellow)
        } else {
            Cell::new(value)
        }
    }

    fn style_heading(&self, text: &str) -> String {
        self.style(Style::new().bold(), text)
    }

    fn style(&self, style: Style, text: &str) -> String {
        if self.supports_color() {
            style.force_styling(true).apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Check if color output is supported
    fn supports_color(&self) -> bool {
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.term.features().colors_supported(),
        }
    }
}

fn resource_header(count: usize) -> impl Iterator<Item = Cell> {
    (0..count).map(|r| Cell::new(ResourceId::new(r)).add_attribute(Attribute::Bold))
}

fn join_ids(ids: &[ProcessId]) -> String {
    if ids.is_empty() {
        return "-".to_string();
    }
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_ids() {
        assert_eq!(join_ids(&[]), "-");
        assert_eq!(join_ids(&[ProcessId::new(1), ProcessId::new(3)]), "P1, P3");
    }

    #[test]
    fn test_verdict_line_without_color() {
        let renderer = OutputRenderer::new(OutputFormat::Plain, ColorChoice::Never);
        let report = SafetyReport {
            safe: false,
            completion_order: vec![ProcessId::new(1)],
            blocked: vec![ProcessId::new(0), ProcessId::new(2)],
            final_available: vec![2],
        };
        assert_eq!(
            renderer.verdict_line(&report),
            "UNSAFE (1 of 3 completed, blocked: P0, P2)"
        );
    }
}
