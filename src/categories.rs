//! Per-category analyzers.
//!
//! Each analyzer reads the same page list and returns its own result; none
//! depends on another's output. Scores use the ratio penalty model from
//! [`crate::scoring::Penalty`].

use crate::duplicates;
use crate::models::{
    AttributeCounts, ContentAnalysis, DuplicateGroup, HeadingsAnalysis, ImageRef, ImagesAnalysis,
    LengthFinding, LinkRef, LinksAnalysis, MobileAnalysis, Page, PageMetric,
    PerformanceAnalysis, Severity, TagAnalysis, TechnicalAnalysis,
};
use crate::scoring::Penalty;
use crate::settings::AnalysisSettings;

/// Score used for a crawl that found pages but no links at all.
pub const NO_LINKS_SCORE: u8 = 70;

/// Placeholder score for the unmeasured mobile category.
pub const MOBILE_PLACEHOLDER_SCORE: u8 = 75;

/// How each defect of a text tag (title or meta description) is weighted.
struct TagRules {
    min_length: usize,
    max_length: usize,
    missing: Severity,
    duplicate: Severity,
    length: Severity,
}

fn analyze_tag<'a>(
    pages: &'a [Page],
    settings: &AnalysisSettings,
    rules: TagRules,
    text: impl Fn(&'a Page) -> &'a str,
    duplicates: Vec<DuplicateGroup>,
) -> TagAnalysis {
    let mut missing = Vec::new();
    let mut too_short = Vec::new();
    let mut too_long = Vec::new();
    let mut optimal = 0;

    for page in pages {
        let value = text(page).trim();
        if value.is_empty() {
            missing.push(page.url.clone());
            continue;
        }

        let length = value.chars().count();
        let finding = || LengthFinding {
            url: page.url.clone(),
            text: value.to_string(),
            length,
        };
        if length < rules.min_length {
            too_short.push(finding());
        } else if length > rules.max_length {
            too_long.push(finding());
        } else {
            optimal += 1;
        }
    }

    let total = pages.len();
    let mut penalty = Penalty::new(&settings.severity_weights);
    penalty
        .add(missing.len(), total, rules.missing)
        .add(duplicates.len(), total, rules.duplicate)
        .add(too_short.len(), total, rules.length)
        .add(too_long.len(), total, rules.length);

    TagAnalysis {
        score: penalty.score(),
        total_pages: total,
        missing,
        duplicates,
        too_short,
        too_long,
        optimal,
    }
}

pub fn analyze_titles(pages: &[Page], settings: &AnalysisSettings) -> TagAnalysis {
    let rules = TagRules {
        min_length: settings.thresholds.title_min_length,
        max_length: settings.thresholds.title_max_length,
        missing: Severity::Error,
        duplicate: Severity::Warning,
        length: Severity::Notice,
    };
    let analysis = analyze_tag(
        pages,
        settings,
        rules,
        |page| page.title.as_str(),
        duplicates::duplicate_titles(pages),
    );
    tracing::debug!(score = analysis.score, "Title analysis complete");
    analysis
}

pub fn analyze_meta_descriptions(pages: &[Page], settings: &AnalysisSettings) -> TagAnalysis {
    let rules = TagRules {
        min_length: settings.thresholds.meta_min_length,
        max_length: settings.thresholds.meta_max_length,
        missing: Severity::Warning,
        duplicate: Severity::Warning,
        length: Severity::Notice,
    };
    let analysis = analyze_tag(
        pages,
        settings,
        rules,
        |page| page.meta_description.as_str(),
        duplicates::duplicate_meta_descriptions(pages),
    );
    tracing::debug!(score = analysis.score, "Meta description analysis complete");
    analysis
}

pub fn analyze_headings(pages: &[Page], settings: &AnalysisSettings) -> HeadingsAnalysis {
    let mut missing_h1 = Vec::new();
    let mut multiple_h1 = Vec::new();

    for page in pages {
        match page.heading_count(1) {
            0 => missing_h1.push(page.url.clone()),
            1 => {}
            count => multiple_h1.push(PageMetric {
                url: page.url.clone(),
                value: count as f64,
            }),
        }
    }

    let total = pages.len();
    let mut penalty = Penalty::new(&settings.severity_weights);
    penalty
        .add(missing_h1.len(), total, Severity::Warning)
        .add(multiple_h1.len(), total, Severity::Warning);

    tracing::debug!(score = penalty.score(), "Headings analysis complete");

    HeadingsAnalysis {
        score: penalty.score(),
        total_pages: total,
        missing_h1,
        multiple_h1,
        pages_with_h2: pages.iter().filter(|p| p.heading_count(2) > 0).count(),
        pages_with_h3: pages.iter().filter(|p| p.heading_count(3) > 0).count(),
    }
}

/// Scores alt text over all images on the site. Title attributes are only
/// counted.
pub fn analyze_images(pages: &[Page], settings: &AnalysisSettings) -> ImagesAnalysis {
    let mut alt = AttributeCounts::default();
    let mut title_attr = AttributeCounts::default();
    let mut images_without_alt = Vec::new();
    let mut images_with_empty_alt = Vec::new();
    let mut total_images = 0;

    for page in pages {
        for image in &page.images {
            total_images += 1;
            alt.record(&image.alt);
            title_attr.record(&image.title);

            let image_ref = || ImageRef {
                page_url: page.url.clone(),
                src: image.src.clone(),
            };
            if image.alt.is_absent() {
                images_without_alt.push(image_ref());
            } else if image.alt.is_empty() {
                images_with_empty_alt.push(image_ref());
            }
        }
    }

    let mut penalty = Penalty::new(&settings.severity_weights);
    penalty
        .add(alt.absent, total_images, Severity::Warning)
        .add(alt.empty, total_images, Severity::Notice);

    tracing::debug!(
        score = penalty.score(),
        total_images,
        "Images analysis complete"
    );

    ImagesAnalysis {
        score: penalty.score(),
        total_pages: pages.len(),
        total_images,
        alt,
        title_attr,
        images_without_alt,
        images_with_empty_alt,
    }
}

pub fn analyze_content(pages: &[Page], settings: &AnalysisSettings) -> ContentAnalysis {
    let thresholds = &settings.thresholds;
    let mut low_word_count = Vec::new();
    let mut low_text_html_ratio = Vec::new();

    for page in pages {
        if page.content.word_count < thresholds.min_word_count {
            low_word_count.push(PageMetric {
                url: page.url.clone(),
                value: page.content.word_count as f64,
            });
        }
        if page.content.text_html_ratio < thresholds.min_text_html_ratio {
            low_text_html_ratio.push(PageMetric {
                url: page.url.clone(),
                value: page.content.text_html_ratio,
            });
        }
    }

    let total = pages.len();
    let mut penalty = Penalty::new(&settings.severity_weights);
    penalty
        .add(low_word_count.len(), total, Severity::Warning)
        .add(low_text_html_ratio.len(), total, Severity::Notice);

    tracing::debug!(score = penalty.score(), "Content analysis complete");

    ContentAnalysis {
        score: penalty.score(),
        total_pages: total,
        low_word_count,
        low_text_html_ratio,
        average_word_count: mean(pages.iter().map(|p| p.content.word_count as f64)),
        average_text_html_ratio: mean(pages.iter().map(|p| p.content.text_html_ratio)),
    }
}

pub fn analyze_links(pages: &[Page], settings: &AnalysisSettings) -> LinksAnalysis {
    let mut pages_with_few_internal_links = Vec::new();
    let mut empty_anchor_links = Vec::new();
    let mut total_links = 0;
    let mut internal_links = 0;
    let mut nofollow_links = 0;

    for page in pages {
        let internal = page.internal_link_count();
        if internal < settings.thresholds.min_internal_links {
            pages_with_few_internal_links.push(PageMetric {
                url: page.url.clone(),
                value: internal as f64,
            });
        }

        for link in &page.links {
            total_links += 1;
            if !link.is_external {
                internal_links += 1;
            }
            if link
                .rel
                .split_whitespace()
                .any(|rel| rel.eq_ignore_ascii_case("nofollow"))
            {
                nofollow_links += 1;
            }
            if link.text.trim().is_empty() {
                empty_anchor_links.push(LinkRef {
                    page_url: page.url.clone(),
                    url: link.url.clone(),
                });
            }
        }
    }

    let total = pages.len();
    let score = if total > 0 && total_links == 0 {
        NO_LINKS_SCORE
    } else {
        let mut penalty = Penalty::new(&settings.severity_weights);
        penalty
            .add(pages_with_few_internal_links.len(), total, Severity::Notice)
            .add(empty_anchor_links.len(), total_links, Severity::Notice);
        penalty.score()
    };

    tracing::debug!(score, total_links, "Links analysis complete");

    LinksAnalysis {
        score,
        total_pages: total,
        total_links,
        internal_links,
        external_links: total_links - internal_links,
        nofollow_links,
        pages_with_few_internal_links,
        empty_anchor_links,
    }
}

pub fn analyze_technical(pages: &[Page], settings: &AnalysisSettings) -> TechnicalAnalysis {
    let urls_where = |predicate: fn(&Page) -> bool| -> Vec<String> {
        pages
            .iter()
            .filter(|page| predicate(page))
            .map(|page| page.url.clone())
            .collect()
    };
    let missing_canonical = urls_where(|page| !page.has_canonical());
    let missing_lang = urls_where(|page| !page.has_lang());
    let missing_schema = urls_where(|page| !page.has_schema());
    let duplicate_canonicals = duplicates::duplicate_canonicals(pages);

    let total = pages.len();
    let mut penalty = Penalty::new(&settings.severity_weights);
    penalty
        .add(missing_canonical.len(), total, Severity::Notice)
        .add(missing_lang.len(), total, Severity::Notice)
        .add(missing_schema.len(), total, Severity::Notice)
        .add(duplicate_canonicals.len(), total, Severity::Warning);

    tracing::debug!(score = penalty.score(), "Technical analysis complete");

    TechnicalAnalysis {
        score: penalty.score(),
        total_pages: total,
        missing_canonical,
        missing_lang,
        missing_schema,
        duplicate_canonicals,
    }
}

pub fn analyze_performance(pages: &[Page], settings: &AnalysisSettings) -> PerformanceAnalysis {
    let thresholds = &settings.thresholds;
    let max_bytes = thresholds.max_page_size_bytes();
    let mut slow_pages = Vec::new();
    let mut large_pages = Vec::new();

    for page in pages {
        if page.response_time > thresholds.max_response_time {
            slow_pages.push(PageMetric {
                url: page.url.clone(),
                value: page.response_time,
            });
        }
        if page.html_size as f64 > max_bytes {
            large_pages.push(PageMetric {
                url: page.url.clone(),
                value: page.html_size as f64,
            });
        }
    }

    let total = pages.len();
    let mut penalty = Penalty::new(&settings.severity_weights);
    penalty
        .add(slow_pages.len(), total, Severity::Warning)
        .add(large_pages.len(), total, Severity::Warning);

    tracing::debug!(score = penalty.score(), "Performance analysis complete");

    PerformanceAnalysis {
        score: penalty.score(),
        total_pages: total,
        slow_pages,
        large_pages,
        average_response_time: mean(pages.iter().map(|p| p.response_time)),
        average_page_size: mean(pages.iter().map(|p| p.html_size as f64)),
    }
}

/// Mobile friendliness is not measured. Crawled sites get a fixed
/// placeholder score so the category still carries its weight; an empty
/// crawl scores 100 like every other category.
pub fn analyze_mobile(pages: &[Page]) -> MobileAnalysis {
    MobileAnalysis {
        score: if pages.is_empty() {
            100
        } else {
            MOBILE_PLACEHOLDER_SCORE
        },
        total_pages: pages.len(),
        checked: false,
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}
