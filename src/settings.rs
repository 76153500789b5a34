use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

use crate::models::{Category, Severity};

/// Thresholds the analyzers and the issue classifier compare page facts against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub title_min_length: usize,
    pub title_max_length: usize,
    pub meta_min_length: usize,
    pub meta_max_length: usize,
    pub min_word_count: usize,
    pub min_text_html_ratio: f64,
    /// Seconds
    pub max_response_time: f64,
    pub max_page_size_mb: f64,
    pub min_internal_links: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            title_min_length: 30,
            title_max_length: 60,
            meta_min_length: 120,
            meta_max_length: 160,
            min_word_count: 300,
            min_text_html_ratio: 0.15,
            max_response_time: 3.0,
            max_page_size_mb: 3.0,
            min_internal_links: 3,
        }
    }
}

impl Thresholds {
    pub fn max_page_size_bytes(&self) -> f64 {
        self.max_page_size_mb * 1024.0 * 1024.0
    }
}

/// Penalty multiplier per severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityWeights {
    pub error: f64,
    pub warning: f64,
    pub notice: f64,
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self {
            error: 5.0,
            warning: 2.0,
            notice: 0.5,
        }
    }
}

impl SeverityWeights {
    pub fn weight(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Error => self.error,
            Severity::Warning => self.warning,
            Severity::Notice => self.notice,
        }
    }
}

/// Contribution of each category to the overall score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryWeights {
    pub title: f64,
    pub meta_description: f64,
    pub headings: f64,
    pub images: f64,
    pub internal_links: f64,
    pub page_speed: f64,
    pub mobile_friendly: f64,
    pub ssl: f64,
    pub content: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            title: 15.0,
            meta_description: 10.0,
            headings: 10.0,
            images: 15.0,
            internal_links: 5.0,
            page_speed: 20.0,
            mobile_friendly: 10.0,
            ssl: 5.0,
            content: 10.0,
        }
    }
}

impl CategoryWeights {
    /// Weight of a category, or `None` for categories outside the overall score.
    pub fn weight(&self, category: Category) -> Option<f64> {
        match category {
            Category::Title => Some(self.title),
            Category::MetaDescription => Some(self.meta_description),
            Category::Headings => Some(self.headings),
            Category::Images => Some(self.images),
            Category::InternalLinks => Some(self.internal_links),
            Category::PageSpeed => Some(self.page_speed),
            Category::MobileFriendly => Some(self.mobile_friendly),
            Category::Ssl => Some(self.ssl),
            Category::Content => Some(self.content),
            Category::Technical => None,
        }
    }

    pub fn entries(&self) -> Vec<(Category, f64)> {
        Category::ALL
            .iter()
            .filter_map(|&category| self.weight(category).map(|weight| (category, weight)))
            .collect()
    }
}

/// All tunable inputs of an analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub thresholds: Thresholds,
    pub category_weights: CategoryWeights,
    pub severity_weights: SeverityWeights,
    pub ssl_timeout_secs: u64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            category_weights: CategoryWeights::default(),
            severity_weights: SeverityWeights::default(),
            ssl_timeout_secs: 10,
        }
    }
}

impl AnalysisSettings {
    /// Rejects settings that would make scores meaningless.
    pub fn validate(&self) -> Result<()> {
        let severities = [
            ("error", self.severity_weights.error),
            ("warning", self.severity_weights.warning),
            ("notice", self.severity_weights.notice),
        ];
        for (name, weight) in severities {
            ensure!(
                weight.is_finite() && weight >= 0.0,
                "Severity weight '{}' must be a non-negative number, got {}",
                name,
                weight
            );
        }

        let mut total = 0.0;
        for (category, weight) in self.category_weights.entries() {
            ensure!(
                weight.is_finite() && weight >= 0.0,
                "Category weight for {} must be a non-negative number, got {}",
                category.label(),
                weight
            );
            total += weight;
        }
        ensure!(total > 0.0, "Category weights must not all be zero");

        let t = &self.thresholds;
        ensure!(
            t.title_min_length <= t.title_max_length,
            "title_min_length ({}) exceeds title_max_length ({})",
            t.title_min_length,
            t.title_max_length
        );
        ensure!(
            t.meta_min_length <= t.meta_max_length,
            "meta_min_length ({}) exceeds meta_max_length ({})",
            t.meta_min_length,
            t.meta_max_length
        );
        ensure!(
            t.min_text_html_ratio.is_finite()
                && t.max_response_time.is_finite()
                && t.max_page_size_mb.is_finite(),
            "Numeric thresholds must be finite"
        );

        Ok(())
    }
}
