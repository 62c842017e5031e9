//! Styled terminal report for the stats subcommand.
//!
//! Colored output for the cleaning summary and the per-side domain
//! aggregates, using the anstyle crate for cross-platform color
//! support. Falls back to plain text when stdout is not a terminal.

use anstyle::{AnsiColor, Color, Style};
use std::fmt::Write;

use crate::structured_output::{DomainReport, SiftReport};

/// Style definitions for different report elements
pub struct Styles {
    pub header: Style,
    pub subheader: Style,
    pub success: Style,
    pub warning: Style,
    pub info: Style,
    pub muted: Style,
    pub bold: Style,
    pub domain: Style,
    pub count: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            header: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Blue))),
            subheader: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Cyan))),
            success: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
            warning: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
            info: Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))),
            muted: Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))),
            bold: Style::new().bold(),
            domain: Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))),
            count: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Magenta))),
        }
    }
}

/// Renders a [`SiftReport`] for human reading.
pub struct StyledFormatter {
    styles: Styles,
    use_colors: bool,
}

impl StyledFormatter {
    /// Create a new styled formatter
    pub fn new() -> Self {
        Self {
            styles: Styles::default(),
            use_colors: Self::should_use_colors(),
        }
    }

    /// Create a formatter without colors (for non-interactive use)
    pub fn without_colors() -> Self {
        Self {
            styles: Styles::default(),
            use_colors: false,
        }
    }

    /// Determine if colors should be used based on environment
    fn should_use_colors() -> bool {
        atty::is(atty::Stream::Stdout) && std::env::var("NO_COLOR").is_err()
    }

    /// Apply style to text if colors are enabled
    fn styled(&self, text: &str, style: &Style) -> String {
        if self.use_colors {
            format!("{}{}{}", style.render(), text, style.render_reset())
        } else {
            text.to_string()
        }
    }

    /// Format the whole report.
    pub fn format_report(&self, report: &SiftReport) -> Result<String, std::fmt::Error> {
        let mut output = String::new();

        writeln!(output)?;
        writeln!(
            output,
            "{}",
            self.styled(
                "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━",
                &self.styles.muted
            )
        )?;
        writeln!(
            output,
            "  {}",
            self.styled(
                &format!("📊 Mail-server statistics for {}", report.input.path),
                &self.styles.header
            )
        )?;
        writeln!(output)?;

        self.write_cleaning_summary(&mut output, report)?;
        self.write_domain_section(&mut output, "Sender domains", &report.sender_domains)?;
        self.write_domain_section(&mut output, "Recipient domains", &report.recipient_domains)?;

        if !report.warnings.is_empty() {
            writeln!(
                output,
                "  {}",
                self.styled("⚠ Warnings", &self.styles.warning)
            )?;
            for warning in &report.warnings {
                writeln!(output, "    {}", self.styled(warning, &self.styles.muted))?;
            }
            writeln!(output)?;
        }

        writeln!(
            output,
            "{}",
            self.styled(
                "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━",
                &self.styles.muted
            )
        )?;
        Ok(output)
    }

    fn write_cleaning_summary(
        &self,
        output: &mut String,
        report: &SiftReport,
    ) -> Result<(), std::fmt::Error> {
        let c = &report.cleaning;
        writeln!(
            output,
            "  {}",
            self.styled("Cleaning", &self.styles.subheader)
        )?;
        writeln!(
            output,
            "    {} rows in, {} rows out ({} duplicate bodies removed, {} cells filled)",
            self.styled(&c.rows_in.to_string(), &self.styles.bold),
            self.styled(&c.rows_out.to_string(), &self.styles.success),
            c.duplicates_removed,
            c.cells_filled
        )?;
        let m = &c.missing;
        writeln!(
            output,
            "    missing before fill: sender {:.1}%, sent_at {:.1}%, recipient {:.1}%, body {:.1}%",
            m.sender * 100.0,
            m.sent_at * 100.0,
            m.recipient * 100.0,
            m.body * 100.0
        )?;
        let d = &report.distinct;
        writeln!(
            output,
            "    distinct values: {} senders, {} recipients, {} bodies",
            d.senders, d.recipients, d.bodies
        )?;
        writeln!(output)?;
        Ok(())
    }

    fn write_domain_section(
        &self,
        output: &mut String,
        title: &str,
        section: &DomainReport,
    ) -> Result<(), std::fmt::Error> {
        writeln!(output, "  {}", self.styled(title, &self.styles.subheader))?;
        writeln!(
            output,
            "    {} distinct, {} at or below {} occurrences",
            self.styled(&section.unique.to_string(), &self.styles.bold),
            self.styled(&section.rare.count.to_string(), &self.styles.count),
            section.rare.threshold
        )?;
        for entry in &section.counts {
            writeln!(
                output,
                "    {:>6}  {}",
                self.styled(&entry.count.to_string(), &self.styles.count),
                self.styled(&entry.domain, &self.styles.domain)
            )?;
        }
        if section.counts.is_empty() {
            writeln!(
                output,
                "    {}",
                self.styled("(no domains derived)", &self.styles.muted)
            )?;
        }
        writeln!(output)?;
        Ok(())
    }

    /// Print the report to stdout.
    pub fn print_report(&self, report: &SiftReport) -> Result<(), std::fmt::Error> {
        print!("{}", self.format_report(report)?);
        Ok(())
    }
}

impl Default for StyledFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::CleanSummary;
    use crate::stats::DomainTally;
    use crate::structured_output::{DistinctCounts, InputInfo, ReportMetadata};

    fn sample_report() -> SiftReport {
        SiftReport {
            metadata: ReportMetadata::default(),
            input: InputInfo {
                path: "a.csv".to_string(),
                rows_loaded: 5,
            },
            cleaning: CleanSummary {
                rows_in: 5,
                rows_out: 4,
                duplicates_removed: 1,
                cells_filled: 2,
                missing: Default::default(),
            },
            distinct: DistinctCounts {
                senders: 4,
                recipients: 4,
                bodies: 4,
            },
            sender_domains: DomainReport::from_tally(
                DomainTally::from_values(["mail.example.com", "unknown"]),
                10,
            ),
            recipient_domains: DomainReport::from_tally(DomainTally::new(), 10),
            warnings: vec!["row 2: expected 4 fields, found 3; missing cells left empty".into()],
        }
    }

    #[test]
    fn plain_report_names_every_section() {
        let text = StyledFormatter::without_colors()
            .format_report(&sample_report())
            .unwrap();
        assert!(text.contains("Mail-server statistics for a.csv"));
        assert!(text.contains("5 rows in, 4 rows out"));
        assert!(text.contains("Sender domains"));
        assert!(text.contains("Recipient domains"));
        assert!(text.contains("mail.example.com"));
        assert!(text.contains("(no domains derived)"));
        assert!(text.contains("Warnings"));
    }

    #[test]
    fn plain_report_carries_no_escape_codes() {
        let text = StyledFormatter::without_colors()
            .format_report(&sample_report())
            .unwrap();
        assert!(!text.contains('\x1b'));
    }
}
