use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::settings::AnalysisSettings;

/// Configuration file structure that mirrors CLI arguments
/// All fields are optional to allow partial configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Maximum crawl depth
    pub depth: Option<usize>,

    /// Maximum number of pages to crawl
    pub max_pages: Option<usize>,

    /// Output format: text or json
    pub output: Option<String>,

    /// Save report to file
    pub save: Option<String>,

    /// Follow external links
    pub external: Option<bool>,

    /// Verbose output
    pub verbose: Option<bool>,

    /// Treat URLs with fragment identifiers (#) as unique links
    pub keep_fragments: Option<bool>,

    /// Rate limit for requests per second
    pub rate_limit: Option<f64>,

    /// Number of concurrent requests
    pub concurrency: Option<usize>,

    /// Scoring thresholds and weights; unset keys keep their defaults
    pub analysis: Option<AnalysisSettings>,
}

/// Configuration file format based on file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                "toml" => Some(ConfigFormat::Toml),
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                _ => None,
            })
    }

    /// Get file extensions for this format
    pub fn extensions(&self) -> &[&str] {
        match self {
            ConfigFormat::Json => &["json"],
            ConfigFormat::Toml => &["toml"],
            ConfigFormat::Yaml => &["yaml", "yml"],
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let format = ConfigFormat::from_path(path)
            .with_context(|| format!("Unsupported config file format: {}", path.display()))?;

        let config = match format {
            ConfigFormat::Json => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?,
            ConfigFormat::Toml => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?,
            ConfigFormat::Yaml => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?,
        };

        Ok(config)
    }

    /// Get the default configuration file paths to check (in order of priority)
    /// Returns paths in order: current directory, user config directory
    pub fn default_paths() -> Vec<PathBuf> {
        let formats = [ConfigFormat::Json, ConfigFormat::Toml, ConfigFormat::Yaml];
        let mut paths = Vec::new();

        for format in &formats {
            for ext in format.extensions() {
                paths.push(PathBuf::from(format!("sitehealth.{}", ext)));
            }
        }

        // Use XDG_CONFIG_HOME if set, otherwise fall back to ~/.config
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")));

        if let Some(config_home) = config_home {
            let config_dir = config_home.join("sitehealth");
            for format in &formats {
                for ext in format.extensions() {
                    paths.push(config_dir.join(format!("config.{}", ext)));
                }
            }
        }

        paths
    }

    /// Try to load configuration from default paths
    /// Returns the first configuration file found, or None if no config exists
    pub fn from_default_paths() -> Result<Option<Self>> {
        for path in Self::default_paths() {
            if path.exists() {
                tracing::info!(path = %path.display(), "Loading configuration");
                return Ok(Some(Self::from_file(&path)?));
            }
        }
        Ok(None)
    }

    /// Loads the explicitly given file, or the first default one found
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(Path::new(path)),
            None => Ok(Self::from_default_paths()?.unwrap_or_default()),
        }
    }

    /// Analysis settings from the file, or the defaults
    pub fn analysis_settings(&self) -> AnalysisSettings {
        self.analysis.clone().unwrap_or_default()
    }

    /// Merge this configuration with CLI arguments
    /// CLI arguments take precedence over config file values
    pub fn merge_with_cli(&self, cli: &Cli) -> Cli {
        Cli {
            url: cli.url.clone(),
            depth: if cli.depth != 5 {
                cli.depth
            } else {
                self.depth.unwrap_or(cli.depth)
            },
            max_pages: if cli.max_pages != 200 {
                cli.max_pages
            } else {
                self.max_pages.unwrap_or(cli.max_pages)
            },
            output: if cli.output != "text" {
                cli.output.clone()
            } else {
                self.output.clone().unwrap_or_else(|| cli.output.clone())
            },
            save: cli.save.clone().or_else(|| self.save.clone()),
            external: cli.external || self.external.unwrap_or(false),
            verbose: cli.verbose || self.verbose.unwrap_or(false),
            keep_fragments: cli.keep_fragments || self.keep_fragments.unwrap_or(false),
            rate_limit: cli.rate_limit.or(self.rate_limit),
            concurrency: if cli.concurrency != 5 {
                cli.concurrency
            } else {
                self.concurrency.unwrap_or(cli.concurrency)
            },
            config: cli.config.clone(),
            input: cli.input.clone(),
            export_pages: cli.export_pages.clone(),
        }
    }
}
