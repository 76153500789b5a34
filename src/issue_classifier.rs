//! Per-instance issue classification.
//!
//! Independent of the category analyzers: every page is checked against a
//! fixed rule table and each hit becomes one issue, filed into exactly one
//! severity bucket and, when the type has one, its detail list.

use crate::models::{
    DuplicateGroup, Image, Issue, IssueReport, IssueType, Page, Severity, SslAnalysis,
};
use crate::settings::Thresholds;

/// A page-level check. `check` returns the issue message when the rule fires.
pub struct PageRule {
    pub issue_type: IssueType,
    pub severity: Severity,
    pub check: fn(&Page, &Thresholds) -> Option<String>,
}

/// A check applied to every image on a page.
pub struct ImageRule {
    pub issue_type: IssueType,
    pub severity: Severity,
    pub check: fn(&Image) -> Option<String>,
}

pub static PAGE_RULES: &[PageRule] = &[
    PageRule {
        issue_type: IssueType::MissingTitle,
        severity: Severity::Error,
        check: missing_title,
    },
    PageRule {
        issue_type: IssueType::Status5xx,
        severity: Severity::Error,
        check: server_error,
    },
    PageRule {
        issue_type: IssueType::Status4xx,
        severity: Severity::Error,
        check: client_error,
    },
    PageRule {
        issue_type: IssueType::MissingMetaDescription,
        severity: Severity::Warning,
        check: missing_meta_description,
    },
    PageRule {
        issue_type: IssueType::MissingH1,
        severity: Severity::Warning,
        check: missing_h1,
    },
    PageRule {
        issue_type: IssueType::MultipleH1,
        severity: Severity::Warning,
        check: multiple_h1,
    },
    PageRule {
        issue_type: IssueType::MissingH2,
        severity: Severity::Notice,
        check: missing_h2,
    },
    PageRule {
        issue_type: IssueType::MissingH3,
        severity: Severity::Notice,
        check: missing_h3,
    },
    PageRule {
        issue_type: IssueType::LowWordCount,
        severity: Severity::Warning,
        check: low_word_count,
    },
    PageRule {
        issue_type: IssueType::LowTextHtmlRatio,
        severity: Severity::Warning,
        check: low_text_html_ratio,
    },
    PageRule {
        issue_type: IssueType::SlowPage,
        severity: Severity::Warning,
        check: slow_page,
    },
    PageRule {
        issue_type: IssueType::LargeHtml,
        severity: Severity::Warning,
        check: large_html,
    },
    PageRule {
        issue_type: IssueType::MissingCanonical,
        severity: Severity::Notice,
        check: missing_canonical,
    },
    PageRule {
        issue_type: IssueType::MissingLang,
        severity: Severity::Notice,
        check: missing_lang,
    },
    PageRule {
        issue_type: IssueType::MissingSchema,
        severity: Severity::Notice,
        check: missing_schema,
    },
];

pub static IMAGE_RULES: &[ImageRule] = &[
    ImageRule {
        issue_type: IssueType::MissingAlt,
        severity: Severity::Warning,
        check: alt_absent,
    },
    ImageRule {
        issue_type: IssueType::EmptyAlt,
        severity: Severity::Warning,
        check: alt_empty,
    },
    ImageRule {
        issue_type: IssueType::MissingImageTitle,
        severity: Severity::Notice,
        check: title_absent,
    },
    ImageRule {
        issue_type: IssueType::EmptyImageTitle,
        severity: Severity::Notice,
        check: title_empty,
    },
];

fn missing_title(page: &Page, _: &Thresholds) -> Option<String> {
    (!page.has_title()).then(|| "Page is missing a title tag".to_string())
}

fn server_error(page: &Page, _: &Thresholds) -> Option<String> {
    (page.status_code >= 500).then(|| format!("Server error (HTTP {})", page.status_code))
}

fn client_error(page: &Page, _: &Thresholds) -> Option<String> {
    (400..500)
        .contains(&page.status_code)
        .then(|| format!("Client error (HTTP {})", page.status_code))
}

fn missing_meta_description(page: &Page, _: &Thresholds) -> Option<String> {
    (!page.has_meta_description()).then(|| "Page is missing a meta description".to_string())
}

fn missing_h1(page: &Page, _: &Thresholds) -> Option<String> {
    (page.heading_count(1) == 0).then(|| "Page is missing an H1 tag".to_string())
}

fn multiple_h1(page: &Page, _: &Thresholds) -> Option<String> {
    let count = page.heading_count(1);
    (count > 1).then(|| format!("Page has multiple H1 tags ({})", count))
}

fn missing_h2(page: &Page, _: &Thresholds) -> Option<String> {
    (page.heading_count(2) == 0).then(|| "Page has no H2 tags".to_string())
}

fn missing_h3(page: &Page, _: &Thresholds) -> Option<String> {
    (page.heading_count(3) == 0).then(|| "Page has no H3 tags".to_string())
}

fn low_word_count(page: &Page, thresholds: &Thresholds) -> Option<String> {
    let words = page.content.word_count;
    (words < thresholds.min_word_count).then(|| {
        format!(
            "Low word count: {} words (minimum {})",
            words, thresholds.min_word_count
        )
    })
}

fn low_text_html_ratio(page: &Page, thresholds: &Thresholds) -> Option<String> {
    let ratio = page.content.text_html_ratio;
    (ratio < thresholds.min_text_html_ratio).then(|| {
        format!(
            "Low text/HTML ratio: {:.1}% (minimum {:.1}%)",
            ratio * 100.0,
            thresholds.min_text_html_ratio * 100.0
        )
    })
}

fn slow_page(page: &Page, thresholds: &Thresholds) -> Option<String> {
    (page.response_time > thresholds.max_response_time).then(|| {
        format!(
            "Slow response: {:.2}s (maximum {:.2}s)",
            page.response_time, thresholds.max_response_time
        )
    })
}

fn large_html(page: &Page, thresholds: &Thresholds) -> Option<String> {
    (page.html_size as f64 > thresholds.max_page_size_bytes()).then(|| {
        format!(
            "HTML too large: {:.2} MB (maximum {:.2} MB)",
            page.html_size as f64 / (1024.0 * 1024.0),
            thresholds.max_page_size_mb
        )
    })
}

fn missing_canonical(page: &Page, _: &Thresholds) -> Option<String> {
    (!page.has_canonical()).then(|| "Page has no canonical URL".to_string())
}

fn missing_lang(page: &Page, _: &Thresholds) -> Option<String> {
    (!page.has_lang()).then(|| "Page has no lang attribute".to_string())
}

fn missing_schema(page: &Page, _: &Thresholds) -> Option<String> {
    (!page.has_schema()).then(|| "Page has no structured data".to_string())
}

fn alt_absent(image: &Image) -> Option<String> {
    image
        .alt
        .is_absent()
        .then(|| format!("Image without alt attribute: {}", image.src))
}

fn alt_empty(image: &Image) -> Option<String> {
    image
        .alt
        .is_empty()
        .then(|| format!("Image with empty alt attribute: {}", image.src))
}

fn title_absent(image: &Image) -> Option<String> {
    image
        .title
        .is_absent()
        .then(|| format!("Image without title attribute: {}", image.src))
}

fn title_empty(image: &Image) -> Option<String> {
    image
        .title
        .is_empty()
        .then(|| format!("Image with empty title attribute: {}", image.src))
}

impl IssueReport {
    /// Files an issue into its severity bucket and its detail list.
    pub fn push(&mut self, issue: Issue) {
        if let Some(list) = issue.issue_type.detail_list() {
            self.details.entry(list).or_default().push(issue.clone());
        }
        match issue.severity {
            Severity::Error => self.errors.push(issue),
            Severity::Warning => self.warnings.push(issue),
            Severity::Notice => self.notices.push(issue),
        }
    }
}

pub struct IssueClassifier<'a> {
    thresholds: &'a Thresholds,
}

impl<'a> IssueClassifier<'a> {
    pub fn new(thresholds: &'a Thresholds) -> Self {
        Self { thresholds }
    }

    /// Runs every rule over every page, then adds one issue per URL in each
    /// duplicate group and a site-level issue when the TLS probe failed.
    pub fn classify(
        &self,
        pages: &[Page],
        duplicate_titles: &[DuplicateGroup],
        duplicate_meta_descriptions: &[DuplicateGroup],
        ssl: &SslAnalysis,
    ) -> IssueReport {
        let mut report = IssueReport::default();

        for page in pages {
            self.classify_page(page, &mut report);
        }

        for group in duplicate_titles {
            for url in &group.urls {
                report.push(Issue {
                    issue_type: IssueType::DuplicateTitle,
                    url: url.clone(),
                    message: format!(
                        "Title \"{}\" is shared by {} pages",
                        group.value, group.count
                    ),
                    severity: Severity::Warning,
                    resource: None,
                });
            }
        }

        for group in duplicate_meta_descriptions {
            for url in &group.urls {
                report.push(Issue {
                    issue_type: IssueType::DuplicateMetaDescription,
                    url: url.clone(),
                    message: format!("Meta description is shared by {} pages", group.count),
                    severity: Severity::Warning,
                    resource: None,
                });
            }
        }

        if ssl.is_missing() {
            report.push(Issue {
                issue_type: IssueType::NoSsl,
                url: pages.first().map(|page| page.url.clone()).unwrap_or_default(),
                message: match &ssl.error {
                    Some(error) => format!("Site is not reachable over HTTPS: {}", error),
                    None => "Site is not reachable over HTTPS".to_string(),
                },
                severity: Severity::Error,
                resource: None,
            });
        }

        tracing::debug!(
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            notices = report.notices.len(),
            "Issue classification complete"
        );

        report
    }

    fn classify_page(&self, page: &Page, report: &mut IssueReport) {
        for rule in PAGE_RULES {
            if let Some(message) = (rule.check)(page, self.thresholds) {
                report.push(Issue {
                    issue_type: rule.issue_type,
                    url: page.url.clone(),
                    message,
                    severity: rule.severity,
                    resource: None,
                });
            }
        }

        for image in &page.images {
            for rule in IMAGE_RULES {
                if let Some(message) = (rule.check)(image) {
                    report.push(Issue {
                        issue_type: rule.issue_type,
                        url: page.url.clone(),
                        message,
                        severity: rule.severity,
                        resource: Some(image.src.clone()),
                    });
                }
            }
        }
    }
}
