// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use crate::exporter::ExportReport;
use crate::io::MapDocument;
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report a finished export
    pub fn report_export(report: &ExportReport, verbose: bool) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!(
            "{} {}",
            "Exported:".bold(),
            report.path.display().to_string().cyan()
        );
        println!("{}", "━".repeat(80).bright_black());

        Self::print_count("Objects", report.objects.len());
        Self::print_count("Materials", report.material_count);
        Self::print_count("Source vertices", report.source_vertex_count);
        Self::print_count("Corners", report.corner_count);
        Self::print_count("Vertices", report.vertex_count);
        Self::print_count("Faces", report.face_count);
        println!(
            "  {} {}",
            "Channels:".bright_black(),
            Self::channels(report.effective.include_uv, report.effective.include_color)
        );
        println!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(report.elapsed).yellow()
        );

        if !report.skipped.is_empty() {
            println!("\n  {}", "Skipped:".yellow().bold());
            for skipped in &report.skipped {
                if verbose {
                    println!("    {} {}", "⚠".yellow(), skipped.error);
                } else {
                    println!("    {} {}", "⚠".yellow(), skipped.name);
                }
            }
        }

        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report the contents of a parsed map file
    pub fn report_document(file: &str, document: &MapDocument) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "Map:".bold(), file.cyan());
        println!("{}", "━".repeat(80).bright_black());
        Self::print_count("Materials", document.materials.len());
        for (slot, name) in document.materials.iter().enumerate() {
            println!("    {} {}", format!("[{}]", slot).bright_black(), name);
        }
        Self::print_count("Vertices", document.vertices.len());
        Self::print_count("Faces", document.faces.len());
        Self::print_count("Corners", document.corner_count());
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }

    fn print_count(name: &str, value: usize) {
        println!(
            "  {} {}",
            format!("{}:", name).bright_black(),
            value.to_string().cyan()
        );
    }

    fn channels(uv: bool, color: bool) -> String {
        match (uv, color) {
            (true, true) => "uv, color".to_string(),
            (true, false) => "uv".to_string(),
            (false, true) => "color".to_string(),
            (false, false) => "none".to_string(),
        }
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}
