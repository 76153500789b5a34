pub mod categories;
pub mod cli;
pub mod config;
pub mod crawler;
pub mod duplicates;
pub mod http_client;
pub mod issue_classifier;
pub mod models;
pub mod recommendations;
pub mod reporter;
pub mod scoring;
pub mod settings;
pub mod site_analyzer;
pub mod ssl_checker;
pub mod summary;

use anyhow::{Context, Result};
use cli::Cli;
use colored::*;
use config::Config;
use crawler::{Crawler, CrawlerConfig};
use models::Page;
use reporter::Reporter;
use site_analyzer::SiteAnalyzer;
use std::fs;
use url::Url;

pub async fn run(args: Cli) -> Result<()> {
    // Validate URL
    if !args.url.starts_with("http://") && !args.url.starts_with("https://") {
        anyhow::bail!("URL must start with http:// or https://");
    }

    let config = Config::load(args.config.as_deref())?;
    let args = config.merge_with_cli(&args);
    let analyzer = SiteAnalyzer::new(config.analysis_settings())
        .context("Invalid analysis settings")?;

    let json_output = args.output == "json";
    if !json_output {
        println!(
            "{}",
            "sitehealth - Site Crawler & Health Analyzer"
                .bright_cyan()
                .bold()
        );
        println!("{}", "=".repeat(50).bright_blue());
        println!();
    }

    let domain = Url::parse(&args.url)
        .context("Invalid URL")?
        .host_str()
        .map(str::to_string)
        .context("URL has no host")?;

    let pages = match &args.input {
        Some(path) => load_pages(path)?,
        None => crawl(&args, json_output).await?,
    };

    if let Some(path) = &args.export_pages {
        let json = serde_json::to_string_pretty(&pages)?;
        fs::write(path, json).with_context(|| format!("Failed to write pages to {}", path))?;
        tracing::info!(path = %path, pages = pages.len(), "Exported crawled pages");
    }

    if args.verbose && !json_output {
        println!("{}", "Analyzing site...".bright_yellow());
    }

    let result = analyzer.analyze_all(&pages, &domain).await?;

    if json_output {
        println!("{}", Reporter::to_json(&result)?);
    } else {
        Reporter::print_text_report(&result);
    }

    if let Some(filename) = &args.save {
        Reporter::save_json_report(&result, filename)?;
        // stdout carries only the report in JSON mode
        if json_output {
            tracing::info!(path = %filename, "Report saved");
        } else {
            println!("Report saved to: {}", filename.bright_green());
        }
    }

    Ok(())
}

async fn crawl(args: &Cli, quiet: bool) -> Result<Vec<Page>> {
    if !quiet {
        println!("{} {}", "Starting crawl:".bright_white().bold(), args.url);
        println!("{} {}", "Max depth:".bright_white().bold(), args.depth);
        println!("{} {}", "Max pages:".bright_white().bold(), args.max_pages);
        println!();
    }

    let mut crawler = Crawler::new(
        &args.url,
        CrawlerConfig {
            max_depth: args.depth,
            max_pages: args.max_pages,
            follow_external: args.external,
            keep_fragments: args.keep_fragments,
            requests_per_second: args.rate_limit,
            concurrent_requests: args.concurrency,
        },
    )?;

    if !quiet {
        crawler.enable_progress_bar();
    }

    crawler.crawl().await?;

    if !quiet {
        println!(
            "{} {} pages crawled",
            "Success:".bright_green().bold(),
            crawler.pages.len()
        );
    }

    Ok(crawler.pages)
}

/// Reads a page list written by `--export-pages` or any compatible tool.
///
/// Bad fields fall back to their defaults; an entry that is not a page
/// object at all is logged and skipped. Only an unreadable file or a
/// document that is not a JSON array is an error.
pub fn load_pages(path: &str) -> Result<Vec<Page>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read pages file: {}", path))?;
    let entries: Vec<serde_json::Value> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse pages file: {}", path))?;

    let mut pages = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<Page>(entry) {
            Ok(page) => pages.push(page),
            Err(e) => tracing::warn!(index, error = %e, "Skipping malformed page entry"),
        }
    }
    Ok(pages)
}
