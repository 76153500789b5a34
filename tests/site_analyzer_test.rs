mod pages;

use pages::{broken_page, healthy_page, image};
use sitehealth::models::{AnalysisResult, Category, Page, Priority, Severity, SslAnalysis};
use sitehealth::settings::{AnalysisSettings, CategoryWeights, Thresholds};
use sitehealth::site_analyzer::SiteAnalyzer;

fn analyze(pages: &[Page]) -> AnalysisResult {
    analyze_with(pages, AnalysisSettings::default(), SslAnalysis::secure(None))
}

fn analyze_with(pages: &[Page], settings: AnalysisSettings, ssl: SslAnalysis) -> AnalysisResult {
    SiteAnalyzer::new(settings)
        .unwrap()
        .analyze_with_ssl(pages, "example.com", ssl)
        .unwrap()
}

fn assert_scores_in_bounds(result: &AnalysisResult) {
    assert!(result.overall_score <= 100);
    for (category, score) in result.category_scores() {
        assert!(score <= 100, "{} out of range: {}", category.label(), score);
    }
}

#[test]
fn test_short_title_scenario() {
    let mut page = healthy_page("https://example.com/");
    page.title = "Welcome".to_string();

    let result = analyze(&[page]);

    assert_eq!(result.title.too_short.len(), 1);
    assert!(result.title.score < 100);
    assert!(result.issues.detail("pages_without_title").is_empty());
}

#[test]
fn test_shared_title_scenario() {
    let mut home = healthy_page("https://example.com/");
    home.title = "Home".to_string();
    let mut other = healthy_page("https://example.com/other");
    other.title = "Home".to_string();

    let result = analyze(&[home, other]);

    assert_eq!(result.duplicate_titles.len(), 1);
    assert_eq!(result.duplicate_titles[0].count, 2);
    assert_eq!(result.title.duplicates.len(), 1);
    assert_eq!(result.issues.detail("duplicate_titles").len(), 2);
    assert_eq!(result.issues.warnings.len(), 2);
}

#[test]
fn test_missing_alt_scenario() {
    let mut page = healthy_page("https://example.com/");
    page.images = vec![image("a.jpg", None, Some("A"))];

    let result = analyze(&[page]);

    assert_eq!(result.images.alt.absent, 1);
    assert_eq!(result.images.images_without_alt.len(), 1);
    let issues = result.issues.detail("images_without_alt");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].severity, Severity::Warning);
}

#[test]
fn test_not_found_scenario() {
    let mut page = healthy_page("https://example.com/gone");
    page.status_code = 404;

    let result = analyze(&[page]);

    assert_eq!(result.issues.errors.len(), 1);
    assert_eq!(result.issues.detail("status_4xx_pages").len(), 1);
    assert!(result.issues.errors[0].message.contains("404"));
    assert!(
        result
            .recommendations
            .iter()
            .any(|r| r.category == Category::Technical && r.priority == Priority::Alto)
    );
}

#[tokio::test]
async fn test_empty_site_scenario() {
    let analyzer = SiteAnalyzer::new(AnalysisSettings::default()).unwrap();
    let result = analyzer.analyze_all(&[], "example.com").await.unwrap();

    assert_eq!(result.overall_score, 100);
    for (category, score) in result.category_scores() {
        assert_eq!(score, 100, "{}", category.label());
    }
    assert_eq!(result.issues.total(), 0);
    assert!(result.recommendations.is_empty());
    assert!(!result.ssl.checked);
    assert_eq!(result.summary.total_pages_analyzed, 0);
    assert_eq!(result.summary.score_breakdown.excellent, 10);
}

#[test]
fn test_slow_page_scenario() {
    let mut pages: Vec<Page> = (0..10)
        .map(|n| healthy_page(&format!("https://example.com/{}", n)))
        .collect();
    pages[0].response_time = 5.0;

    let result = analyze(&pages);

    assert_eq!(result.performance.slow_pages.len(), 1);
    // 1 of 10 pages at warning weight
    assert_eq!(result.performance.score, 80);
    let slow = result.issues.detail("slow_pages");
    assert_eq!(slow.len(), 1);
    assert_eq!(slow[0].severity, Severity::Warning);
}

#[test]
fn test_healthy_site_only_loses_mobile_placeholder() {
    let pages = vec![
        healthy_page("https://example.com/"),
        healthy_page("https://example.com/a"),
    ];
    let result = analyze(&pages);

    assert_eq!(result.issues.total(), 0);
    assert!(result.recommendations.is_empty());
    assert_eq!(result.mobile.score, 75);
    // 9 weighted categories at 100 plus mobile at 75 with weight 10 of 100
    assert_eq!(result.overall_score, 98);
    assert_eq!(result.site_health(), result.overall_score);
}

#[test]
fn test_summary_matches_result() {
    let pages = vec![
        healthy_page("https://example.com/"),
        broken_page("https://example.com/broken"),
    ];
    let result = analyze(&pages);
    let summary = &result.summary;

    assert_eq!(summary.report_title, "Site Health Report: example.com");
    assert_eq!(summary.domain, "example.com");
    assert_eq!(summary.total_pages_analyzed, 2);
    assert_eq!(summary.overall_score, result.overall_score);
    assert_eq!(summary.total_issues, result.issues.total());
    assert_eq!(
        summary.total_issues,
        result.issues.errors.len() + result.issues.warnings.len() + result.issues.notices.len()
    );
    assert_eq!(summary.total_recommendations, result.recommendations.len());

    let breakdown = summary.score_breakdown;
    assert_eq!(
        breakdown.excellent + breakdown.good + breakdown.needs_improvement + breakdown.poor,
        Category::ALL.len()
    );
    assert!(chrono::DateTime::parse_from_rfc3339(&summary.analysis_date).is_ok());
}

#[test]
fn test_broken_site_stays_in_bounds() {
    let pages: Vec<Page> = (0..5)
        .map(|n| broken_page(&format!("https://example.com/{}", n)))
        .collect();
    let result = analyze_with(
        &pages,
        AnalysisSettings::default(),
        SslAnalysis::failed("handshake failed"),
    );

    assert_scores_in_bounds(&result);
    assert_eq!(result.ssl.score, 0);
    assert_eq!(result.title.score, 0);
    assert!(
        result
            .recommendations
            .iter()
            .any(|r| r.category == Category::Ssl && r.priority == Priority::Alto)
    );
}

#[test]
fn test_repeated_runs_agree() {
    let pages = vec![
        healthy_page("https://example.com/"),
        broken_page("https://example.com/broken"),
    ];
    let analyzer = SiteAnalyzer::new(AnalysisSettings::default()).unwrap();

    let mut first = analyzer
        .analyze_with_ssl(&pages, "example.com", SslAnalysis::secure(None))
        .unwrap();
    let mut second = analyzer
        .analyze_with_ssl(&pages, "example.com", SslAnalysis::secure(None))
        .unwrap();
    first.summary.analysis_date.clear();
    second.summary.analysis_date.clear();

    assert_eq!(first, second);
}

#[test]
fn test_adding_a_broken_page_never_raises_scores() {
    let healthy: Vec<Page> = (0..4)
        .map(|n| healthy_page(&format!("https://example.com/{}", n)))
        .collect();
    let mut with_broken = healthy.clone();
    with_broken.push(broken_page("https://example.com/broken"));

    let before = analyze(&healthy);
    let after = analyze(&with_broken);

    assert!(after.overall_score <= before.overall_score);
    for category in Category::ALL {
        assert!(
            after.category_score(category) <= before.category_score(category),
            "{} went up",
            category.label()
        );
    }
    assert!(after.issues.total() > before.issues.total());
}

#[test]
fn test_custom_thresholds_change_findings() {
    let mut page = healthy_page("https://example.com/");
    page.response_time = 5.0;
    let settings = AnalysisSettings {
        thresholds: Thresholds {
            max_response_time: 10.0,
            ..Default::default()
        },
        ..Default::default()
    };

    let result = analyze_with(&[page], settings, SslAnalysis::secure(None));

    assert!(result.performance.slow_pages.is_empty());
    assert!(result.issues.detail("slow_pages").is_empty());
}

#[test]
fn test_custom_weights_change_overall_score() {
    let pages = vec![healthy_page("https://example.com/")];
    let settings = AnalysisSettings {
        category_weights: CategoryWeights {
            mobile_friendly: 0.0,
            ..Default::default()
        },
        ..Default::default()
    };

    let result = analyze_with(&pages, settings, SslAnalysis::secure(None));
    assert_eq!(result.overall_score, 100);
}

#[test]
fn test_negative_weight_is_rejected() {
    let settings = AnalysisSettings {
        category_weights: CategoryWeights {
            title: -1.0,
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(SiteAnalyzer::new(settings).is_err());
}

#[test]
fn test_zero_weights_are_rejected() {
    let settings = AnalysisSettings {
        category_weights: CategoryWeights {
            title: 0.0,
            meta_description: 0.0,
            headings: 0.0,
            images: 0.0,
            internal_links: 0.0,
            page_speed: 0.0,
            mobile_friendly: 0.0,
            ssl: 0.0,
            content: 0.0,
        },
        ..Default::default()
    };
    assert!(SiteAnalyzer::new(settings).is_err());
}
