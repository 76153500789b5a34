use anyhow::Result;

use crate::categories;
use crate::issue_classifier::IssueClassifier;
use crate::models::{AnalysisResult, Category, Page, SslAnalysis};
use crate::recommendations::{self, RecommendationInput};
use crate::scoring::weighted_score;
use crate::settings::AnalysisSettings;
use crate::ssl_checker::SslChecker;
use crate::summary::{self, SummaryInput};

/// Runs the full analysis pipeline over a finished crawl.
///
/// Holds nothing but settings; every call recomputes from the pages it is
/// given.
pub struct SiteAnalyzer {
    settings: AnalysisSettings,
}

impl SiteAnalyzer {
    /// Fails when the settings are unusable (negative or all-zero weights,
    /// inverted bounds).
    pub fn new(settings: AnalysisSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Probes TLS for `domain`, then analyzes `pages`.
    ///
    /// The probe is skipped when there are no pages.
    pub async fn analyze_all(&self, pages: &[Page], domain: &str) -> Result<AnalysisResult> {
        let ssl = if pages.is_empty() {
            SslAnalysis::unchecked()
        } else {
            SslChecker::new(self.settings.ssl_timeout_secs)
                .check(domain)
                .await
        };
        self.analyze_with_ssl(pages, domain, ssl)
    }

    /// Analyzes `pages` with an already known TLS result.
    pub fn analyze_with_ssl(
        &self,
        pages: &[Page],
        domain: &str,
        ssl: SslAnalysis,
    ) -> Result<AnalysisResult> {
        let analysis_date = chrono::Utc::now().to_rfc3339();
        self.analyze_at(pages, domain, ssl, analysis_date)
    }

    fn analyze_at(
        &self,
        pages: &[Page],
        domain: &str,
        ssl: SslAnalysis,
        analysis_date: String,
    ) -> Result<AnalysisResult> {
        let settings = &self.settings;
        tracing::info!(pages = pages.len(), domain = %domain, "Analyzing site");

        let title = categories::analyze_titles(pages, settings);
        let meta_description = categories::analyze_meta_descriptions(pages, settings);
        let headings = categories::analyze_headings(pages, settings);
        let images = categories::analyze_images(pages, settings);
        let content = categories::analyze_content(pages, settings);
        let links = categories::analyze_links(pages, settings);
        let technical = categories::analyze_technical(pages, settings);
        let performance = categories::analyze_performance(pages, settings);
        let mobile = categories::analyze_mobile(pages);

        // Same groups the title and meta analyzers scored against.
        let duplicate_titles = title.duplicates.clone();
        let duplicate_meta_descriptions = meta_description.duplicates.clone();

        let issues = IssueClassifier::new(&settings.thresholds).classify(
            pages,
            &duplicate_titles,
            &duplicate_meta_descriptions,
            &ssl,
        );

        let category_scores = [
            (Category::Title, title.score),
            (Category::MetaDescription, meta_description.score),
            (Category::Headings, headings.score),
            (Category::Images, images.score),
            (Category::InternalLinks, links.score),
            (Category::PageSpeed, performance.score),
            (Category::MobileFriendly, mobile.score),
            (Category::Ssl, ssl.score),
            (Category::Content, content.score),
            (Category::Technical, technical.score),
        ];
        let overall_score = weighted_score(&category_scores, &settings.category_weights)?;

        let recommendations = recommendations::generate(&RecommendationInput {
            title: &title,
            meta_description: &meta_description,
            headings: &headings,
            images: &images,
            content: &content,
            links: &links,
            technical: &technical,
            performance: &performance,
            ssl: &ssl,
            issues: &issues,
        });

        let summary = summary::build(SummaryInput {
            domain,
            analysis_date,
            total_pages: pages.len(),
            overall_score,
            category_scores: &category_scores,
            issues: &issues,
            recommendations: &recommendations,
        });

        tracing::info!(
            overall_score,
            issues = issues.total(),
            recommendations = recommendations.len(),
            "Analysis complete"
        );

        Ok(AnalysisResult {
            domain: domain.to_string(),
            title,
            meta_description,
            headings,
            images,
            content,
            links,
            technical,
            performance,
            mobile,
            ssl,
            issues,
            duplicate_titles,
            duplicate_meta_descriptions,
            overall_score,
            recommendations,
            summary,
        })
    }
}
