use console::style;
use std::path::Path;

use crate::types::{CodebaseAnalysis, ComplexitySummary};

pub struct Output {
    quiet: bool,
}

impl Output {
    pub fn new() -> Self {
        Self { quiet: false }
    }

    /// Suppresses everything except errors
    pub fn quiet() -> Self {
        Self { quiet: true }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✓").green(), message);
        }
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    pub fn header(&self, message: &str) {
        if !self.quiet {
            println!("\n{}", style(message).bold().underlined());
        }
    }

    pub fn section(&self, message: &str) {
        if !self.quiet {
            println!("\n{}", style(message).bold());
            println!("{}", "─".repeat(40));
        }
    }

    /// Console digest of a finished report
    pub fn report_summary(&self, report: &CodebaseAnalysis, written_to: &Path) {
        if self.quiet {
            return;
        }

        self.header(&format!("Analysis of {}", report.overview.project_name));
        if !report.overview.description.is_empty() {
            println!("{}", report.overview.description);
        }

        let stats = &report.statistics;
        self.section("Statistics");
        println!("  Files:          {}", stats.total_files);
        println!(
            "  Lines:          {} ({} code)",
            stats.total_lines, stats.total_code_lines
        );
        println!("  Classes:        {}", stats.total_classes);
        println!("  Key methods:    {}", report.key_methods.len());

        self.section("Components");
        for (role, classes) in report.key_components.iter() {
            println!("  {:<16}{}", format!("{}:", role), classes.len());
        }

        self.section("Complexity");
        match &report.complexity_summary {
            ComplexitySummary::Measured {
                metrics,
                interpretation,
            } => {
                println!(
                    "  avg {:.2}  max {:.2}  min {:.2}",
                    metrics.average, metrics.max, metrics.min
                );
                if !metrics.high_complexity_files.is_empty() {
                    println!(
                        "  {} {} high-complexity files",
                        style("⚠").yellow(),
                        metrics.high_complexity_files.len()
                    );
                }
                if let Some(text) = interpretation {
                    println!("  {}", style(text).dim());
                }
            }
            ComplexitySummary::NoData { message } => println!("  {}", message),
        }

        if !report.noteworthy_aspects.is_empty() {
            self.section("Noteworthy");
            for aspect in &report.noteworthy_aspects {
                println!("  • {}", aspect);
            }
        }

        if !report.recommendations.is_empty() {
            self.section("Recommendations");
            for recommendation in &report.recommendations {
                println!("  • {}", recommendation);
            }
        }

        println!();
        self.success(&format!("Report written to {}", written_to.display()));
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
