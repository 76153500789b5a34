use crate::models::{AnalysisResult, Issue, Priority, Severity};
use anyhow::{Context, Result};
use colored::*;
use std::fs::File;
use std::io::Write;

/// Detail rows printed per list before the rest is summarized
const MAX_DETAIL_ROWS: usize = 10;

pub struct Reporter;

impl Reporter {
    pub fn to_json(result: &AnalysisResult) -> Result<String> {
        serde_json::to_string_pretty(result).context("Failed to serialize report")
    }

    pub fn print_text_report(result: &AnalysisResult) {
        let summary = &result.summary;

        println!("\n{}", "=".repeat(80).bright_blue());
        println!("{}", summary.report_title.bright_cyan().bold());
        println!("{}", "=".repeat(80).bright_blue());
        println!();

        println!("{}: {}", "Domain".bright_white().bold(), summary.domain);
        println!("{}: {}", "Date".bright_white().bold(), summary.analysis_date);
        println!();

        println!("{}", "Summary".bright_yellow().bold().underline());
        println!(
            "  Pages Analyzed:      {}",
            summary.total_pages_analyzed.to_string().bright_green()
        );
        println!(
            "  Site Health:         {}",
            Self::colored_score(result.site_health(), "%")
        );
        println!(
            "  Errors:              {}",
            Self::colored_count(result.issues.errors.len(), Severity::Error)
        );
        println!(
            "  Warnings:            {}",
            Self::colored_count(result.issues.warnings.len(), Severity::Warning)
        );
        println!(
            "  Notices:             {}",
            Self::colored_count(result.issues.notices.len(), Severity::Notice)
        );
        println!("  Total Issues:        {}", summary.total_issues);
        println!();

        println!("{}", "Category Scores".bright_yellow().bold().underline());
        for (category, score) in result.category_scores() {
            println!(
                "  {:<20} {}",
                category.label(),
                Self::colored_score(score, "/100")
            );
        }
        let breakdown = &summary.score_breakdown;
        println!(
            "  {} excellent, {} good, {} needs improvement, {} poor",
            breakdown.excellent.to_string().bright_green(),
            breakdown.good.to_string().green(),
            breakdown.needs_improvement.to_string().yellow(),
            breakdown.poor.to_string().bright_red()
        );
        if let Some(expires) = &result.ssl.certificate_expires {
            println!("  Certificate expires: {}", expires);
        }
        println!();

        if !result.issues.details.is_empty() {
            println!("{}", "Issues".bright_yellow().bold().underline());
            for (list, issues) in &result.issues.details {
                Self::print_detail_list(list, issues);
            }
            println!();
        }

        if !result.recommendations.is_empty() {
            println!("{}", "Recommendations".bright_yellow().bold().underline());
            for recommendation in &result.recommendations {
                let priority = match recommendation.priority {
                    Priority::Alto => "ALTO ".bright_red(),
                    Priority::Medio => "MEDIO".yellow(),
                    Priority::Basso => "BASSO".bright_cyan(),
                };
                println!(
                    "  [{}] {}: {}",
                    priority,
                    recommendation.category.label().bright_white().bold(),
                    recommendation.issue
                );
                println!("          {}", recommendation.recommendation.dimmed());
            }
        }

        println!();
        println!("{}", "=".repeat(80).bright_blue());
    }

    fn print_detail_list(list: &str, issues: &[Issue]) {
        let Some(first) = issues.first() else {
            return;
        };
        let heading = format!("{} ({})", list.replace('_', " "), issues.len());
        println!();
        println!(
            "  [{}] {}",
            Self::severity_label(first.severity),
            heading.bright_white().bold()
        );
        for issue in issues.iter().take(MAX_DETAIL_ROWS) {
            println!("      {} - {}", issue.url, issue.message);
        }
        if issues.len() > MAX_DETAIL_ROWS {
            println!(
                "      {}",
                format!("... and {} more", issues.len() - MAX_DETAIL_ROWS).dimmed()
            );
        }
    }

    fn severity_label(severity: Severity) -> ColoredString {
        match severity {
            Severity::Error => "ERROR ".bright_red(),
            Severity::Warning => "WARN  ".yellow(),
            Severity::Notice => "NOTICE".bright_cyan(),
        }
    }

    fn colored_score(score: u8, suffix: &str) -> ColoredString {
        let text = format!("{}{}", score, suffix);
        match score {
            90.. => text.bright_green(),
            70..=89 => text.green(),
            50..=69 => text.yellow(),
            _ => text.bright_red(),
        }
    }

    fn colored_count(count: usize, severity: Severity) -> ColoredString {
        let text = count.to_string();
        if count == 0 {
            return text.bright_green();
        }
        match severity {
            Severity::Error => text.bright_red(),
            Severity::Warning => text.yellow(),
            Severity::Notice => text.bright_cyan(),
        }
    }

    pub fn save_json_report(result: &AnalysisResult, filename: &str) -> Result<()> {
        let json = Self::to_json(result)?;
        let mut file = File::create(filename)
            .with_context(|| format!("Failed to create report file: {}", filename))?;
        file.write_all(json.as_bytes())
            .with_context(|| format!("Failed to write report file: {}", filename))?;
        Ok(())
    }
}
