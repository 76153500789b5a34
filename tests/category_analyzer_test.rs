mod pages;

use pages::{broken_page, healthy_page, image, link};
use sitehealth::categories::{
    MOBILE_PLACEHOLDER_SCORE, NO_LINKS_SCORE, analyze_content, analyze_headings, analyze_images,
    analyze_links, analyze_meta_descriptions, analyze_mobile, analyze_performance,
    analyze_technical, analyze_titles,
};
use sitehealth::models::Page;
use sitehealth::settings::AnalysisSettings;

fn settings() -> AnalysisSettings {
    AnalysisSettings::default()
}

#[test]
fn test_healthy_pages_score_100_everywhere() {
    let pages = vec![
        healthy_page("https://example.com/a"),
        healthy_page("https://example.com/b"),
    ];
    let settings = settings();

    assert_eq!(analyze_titles(&pages, &settings).score, 100);
    assert_eq!(analyze_meta_descriptions(&pages, &settings).score, 100);
    assert_eq!(analyze_headings(&pages, &settings).score, 100);
    assert_eq!(analyze_images(&pages, &settings).score, 100);
    assert_eq!(analyze_content(&pages, &settings).score, 100);
    assert_eq!(analyze_links(&pages, &settings).score, 100);
    assert_eq!(analyze_technical(&pages, &settings).score, 100);
    assert_eq!(analyze_performance(&pages, &settings).score, 100);
}

#[test]
fn test_empty_site_scores_100_everywhere() {
    let pages: Vec<Page> = vec![];
    let settings = settings();

    assert_eq!(analyze_titles(&pages, &settings).score, 100);
    assert_eq!(analyze_meta_descriptions(&pages, &settings).score, 100);
    assert_eq!(analyze_headings(&pages, &settings).score, 100);
    assert_eq!(analyze_images(&pages, &settings).score, 100);
    assert_eq!(analyze_content(&pages, &settings).score, 100);
    assert_eq!(analyze_links(&pages, &settings).score, 100);
    assert_eq!(analyze_technical(&pages, &settings).score, 100);
    assert_eq!(analyze_performance(&pages, &settings).score, 100);
    assert_eq!(analyze_mobile(&pages).score, 100);
}

#[test]
fn test_short_title_is_flagged_but_not_missing() {
    let mut page = healthy_page("https://example.com/");
    page.title = "Welcome".to_string();

    let analysis = analyze_titles(&[page], &settings());
    assert_eq!(analysis.too_short.len(), 1);
    assert_eq!(analysis.too_short[0].length, 7);
    assert!(analysis.missing.is_empty());
    // 1/1 pages at notice weight 0.5
    assert_eq!(analysis.score, 50);
}

#[test]
fn test_title_length_bounds_are_inclusive() {
    let mut at_min = healthy_page("https://example.com/min");
    at_min.title = "t".repeat(30);
    let mut at_max = healthy_page("https://example.com/max");
    at_max.title = "t".repeat(60);
    let mut over = healthy_page("https://example.com/over");
    over.title = "t".repeat(61);

    let analysis = analyze_titles(&[at_min, at_max, over], &settings());
    assert_eq!(analysis.optimal, 2);
    assert!(analysis.too_short.is_empty());
    assert_eq!(analysis.too_long.len(), 1);
    assert_eq!(analysis.too_long[0].url, "https://example.com/over");
}

#[test]
fn test_title_length_counts_characters_not_bytes() {
    let mut page = healthy_page("https://example.com/");
    // 30 characters, 60 bytes
    page.title = "é".repeat(30);

    let analysis = analyze_titles(&[page], &settings());
    assert_eq!(analysis.optimal, 1);
}

#[test]
fn test_missing_title_is_error_weighted() {
    let mut missing = healthy_page("https://example.com/a");
    missing.title = "   ".to_string();
    let pages = vec![
        missing,
        healthy_page("https://example.com/b"),
        healthy_page("https://example.com/c"),
        healthy_page("https://example.com/d"),
        healthy_page("https://example.com/e"),
        healthy_page("https://example.com/f"),
        healthy_page("https://example.com/g"),
        healthy_page("https://example.com/h"),
        healthy_page("https://example.com/i"),
        healthy_page("https://example.com/j"),
    ];

    let analysis = analyze_titles(&pages, &settings());
    assert_eq!(analysis.missing, vec!["https://example.com/a"]);
    // 1/10 at error weight 5.0
    assert_eq!(analysis.score, 50);
}

#[test]
fn test_duplicate_titles_use_group_count() {
    let mut pages: Vec<Page> = (0..4)
        .map(|n| healthy_page(&format!("https://example.com/{}", n)))
        .collect();
    for page in pages.iter_mut().take(3) {
        page.title = "Shared page title that is long enough".to_string();
    }

    let analysis = analyze_titles(&pages, &settings());
    assert_eq!(analysis.duplicates.len(), 1);
    assert_eq!(analysis.duplicates[0].count, 3);
    // one group over four pages at warning weight: 0.25 * 2.0
    assert_eq!(analysis.score, 50);
}

#[test]
fn test_missing_meta_is_warning_weighted() {
    let mut page = healthy_page("https://example.com/a");
    page.meta_description = String::new();
    let pages = vec![
        page,
        healthy_page("https://example.com/b"),
        healthy_page("https://example.com/c"),
        healthy_page("https://example.com/d"),
    ];

    let analysis = analyze_meta_descriptions(&pages, &settings());
    assert_eq!(analysis.missing.len(), 1);
    // 1/4 at warning weight 2.0
    assert_eq!(analysis.score, 50);
}

#[test]
fn test_meta_length_uses_meta_bounds() {
    let mut short = healthy_page("https://example.com/a");
    short.meta_description = "m".repeat(119);
    let mut long = healthy_page("https://example.com/b");
    long.meta_description = "m".repeat(161);

    let analysis = analyze_meta_descriptions(&[short, long], &settings());
    assert_eq!(analysis.too_short.len(), 1);
    assert_eq!(analysis.too_long.len(), 1);
    assert_eq!(analysis.optimal, 0);
}

#[test]
fn test_headings_missing_and_multiple_h1() {
    let mut missing = healthy_page("https://example.com/a");
    missing.headings.remove(&1);
    let mut multiple = healthy_page("https://example.com/b");
    multiple
        .headings
        .insert(1, vec!["One".to_string(), "Two".to_string()]);
    let pages = vec![
        missing,
        multiple,
        healthy_page("https://example.com/c"),
        healthy_page("https://example.com/d"),
    ];

    let analysis = analyze_headings(&pages, &settings());
    assert_eq!(analysis.missing_h1, vec!["https://example.com/a"]);
    assert_eq!(analysis.multiple_h1.len(), 1);
    assert_eq!(analysis.multiple_h1[0].value, 2.0);
    // (1/4 + 1/4) * 2.0 = 1.0
    assert_eq!(analysis.score, 0);
}

#[test]
fn test_images_tri_state_alt_counting() {
    let mut page = healthy_page("https://example.com/");
    page.images = vec![
        image("a.jpg", None, None),
        image("b.jpg", Some(""), Some("")),
        image("c.jpg", Some("  "), Some("Caption")),
        image("d.jpg", Some("Diagram"), None),
    ];

    let analysis = analyze_images(&[page], &settings());
    assert_eq!(analysis.total_images, 4);
    assert_eq!(analysis.alt.absent, 1);
    assert_eq!(analysis.alt.empty, 2);
    assert_eq!(analysis.alt.filled, 1);
    assert_eq!(analysis.alt.with_attribute, 3);
    assert_eq!(analysis.title_attr.absent, 2);
    assert_eq!(analysis.title_attr.empty, 1);
    assert_eq!(analysis.title_attr.filled, 1);
    assert_eq!(analysis.images_without_alt.len(), 1);
    assert_eq!(analysis.images_without_alt[0].src, "a.jpg");
    assert_eq!(analysis.images_with_empty_alt.len(), 2);
    // 1/4 * 2.0 + 2/4 * 0.5 = 0.75
    assert_eq!(analysis.score, 25);
}

#[test]
fn test_image_title_attributes_do_not_affect_score() {
    let mut page = healthy_page("https://example.com/");
    page.images = vec![image("a.jpg", Some("Alt"), None), image("b.jpg", Some("Alt"), Some(""))];

    let analysis = analyze_images(&[page], &settings());
    assert_eq!(analysis.title_attr.absent, 1);
    assert_eq!(analysis.title_attr.empty, 1);
    assert_eq!(analysis.score, 100);
}

#[test]
fn test_images_ratio_is_over_images_not_pages() {
    let mut page = healthy_page("https://example.com/a");
    page.images = (0..10)
        .map(|n| image(&format!("{}.jpg", n), if n == 0 { None } else { Some("Alt") }, None))
        .collect();
    let pages = vec![page, healthy_page("https://example.com/b")];

    let analysis = analyze_images(&pages, &settings());
    assert_eq!(analysis.total_images, 11);
    // 1/11 * 2.0 = 0.1818.. -> 82
    assert_eq!(analysis.score, 82);
}

#[test]
fn test_content_thresholds_and_averages() {
    let mut thin = healthy_page("https://example.com/a");
    thin.content.word_count = 100;
    thin.content.text_html_ratio = 0.05;
    let pages = vec![thin, healthy_page("https://example.com/b")];

    let analysis = analyze_content(&pages, &settings());
    assert_eq!(analysis.low_word_count.len(), 1);
    assert_eq!(analysis.low_text_html_ratio.len(), 1);
    assert_eq!(analysis.average_word_count, 450.0);
    assert!((analysis.average_text_html_ratio - 0.225).abs() < 1e-9);
    // 1/2 * 2.0 + 1/2 * 0.5 = 1.25 -> floored at 0
    assert_eq!(analysis.score, 0);
}

#[test]
fn test_content_respects_custom_threshold() {
    let mut page = healthy_page("https://example.com/");
    page.content.word_count = 200;
    let mut settings = settings();
    settings.thresholds.min_word_count = 150;

    let analysis = analyze_content(&[page], &settings);
    assert!(analysis.low_word_count.is_empty());
    assert_eq!(analysis.score, 100);
}

#[test]
fn test_internal_link_threshold_is_strict() {
    let exactly_three = healthy_page("https://example.com/a");
    let mut two = healthy_page("https://example.com/b");
    two.links.pop();
    two.links.push(link("https://other.example.org/", "Partner", true));

    let analysis = analyze_links(&[exactly_three, two], &settings());
    assert_eq!(analysis.pages_with_few_internal_links.len(), 1);
    assert_eq!(
        analysis.pages_with_few_internal_links[0].url,
        "https://example.com/b"
    );
    assert_eq!(analysis.internal_links, 5);
    assert_eq!(analysis.external_links, 1);
    // 1/2 * 0.5 = 0.25
    assert_eq!(analysis.score, 75);
}

#[test]
fn test_empty_anchor_ratio_is_over_links() {
    let mut page = healthy_page("https://example.com/");
    page.links[0].text = "  ".to_string();
    let mut nofollow = link("https://example.com/n", "Sponsored", false);
    nofollow.rel = "sponsored NOFOLLOW".to_string();
    page.links.push(nofollow);

    let analysis = analyze_links(&[page], &settings());
    assert_eq!(analysis.total_links, 4);
    assert_eq!(analysis.empty_anchor_links.len(), 1);
    assert_eq!(analysis.nofollow_links, 1);
    // 1/4 * 0.5 = 0.125 -> 87.5 -> 88
    assert_eq!(analysis.score, 88);
}

#[test]
fn test_site_without_links_scores_fixed_value() {
    let mut page = healthy_page("https://example.com/");
    page.links.clear();

    let analysis = analyze_links(&[page], &settings());
    assert_eq!(analysis.total_links, 0);
    assert_eq!(analysis.score, NO_LINKS_SCORE);
    assert_eq!(NO_LINKS_SCORE, 70);
}

#[test]
fn test_technical_missing_and_duplicate_canonicals() {
    let mut bare = healthy_page("https://example.com/a");
    bare.canonical_url = None;
    bare.lang = Some(" ".to_string());
    bare.schema_markup.clear();
    let mut dup_one = healthy_page("https://example.com/b");
    dup_one.canonical_url = Some("https://example.com/".to_string());
    let mut dup_two = healthy_page("https://example.com/c");
    dup_two.canonical_url = Some("https://example.com/".to_string());
    let fine = healthy_page("https://example.com/d");

    let analysis = analyze_technical(&[bare, dup_one, dup_two, fine], &settings());
    assert_eq!(analysis.missing_canonical, vec!["https://example.com/a"]);
    assert_eq!(analysis.missing_lang, vec!["https://example.com/a"]);
    assert_eq!(analysis.missing_schema, vec!["https://example.com/a"]);
    assert_eq!(analysis.duplicate_canonicals.len(), 1);
    // 3 * (1/4 * 0.5) + 1/4 * 2.0 = 0.875 -> 12.5 -> 13
    assert_eq!(analysis.score, 13);
}

#[test]
fn test_performance_slow_and_large_pages() {
    let mut slow = healthy_page("https://example.com/a");
    slow.response_time = 5.0;
    let mut large = healthy_page("https://example.com/b");
    large.html_size = 3 * 1024 * 1024 + 1;
    let mut at_limit = healthy_page("https://example.com/c");
    at_limit.response_time = 3.0;
    at_limit.html_size = 3 * 1024 * 1024;
    let fine = healthy_page("https://example.com/d");

    let analysis = analyze_performance(&[slow, large, at_limit, fine], &settings());
    assert_eq!(analysis.slow_pages.len(), 1);
    assert_eq!(analysis.slow_pages[0].value, 5.0);
    assert_eq!(analysis.large_pages.len(), 1);
    // (1/4 + 1/4) * 2.0 = 1.0
    assert_eq!(analysis.score, 0);
    assert!((analysis.average_response_time - (5.0 + 0.4 + 3.0 + 0.4) / 4.0).abs() < 1e-9);
}

#[test]
fn test_performance_respects_custom_response_time() {
    let mut slow = healthy_page("https://example.com/");
    slow.response_time = 5.0;
    let mut settings = settings();
    settings.thresholds.max_response_time = 10.0;

    let analysis = analyze_performance(&[slow], &settings);
    assert!(analysis.slow_pages.is_empty());
    assert_eq!(analysis.score, 100);
}

#[test]
fn test_mobile_placeholder() {
    let analysis = analyze_mobile(&[healthy_page("https://example.com/")]);
    assert_eq!(analysis.score, MOBILE_PLACEHOLDER_SCORE);
    assert_eq!(analysis.score, 75);
    assert!(!analysis.checked);
}

#[test]
fn test_scores_stay_in_bounds_for_broken_pages() {
    let pages = vec![
        broken_page("https://example.com/a"),
        broken_page("https://example.com/b"),
    ];
    let settings = settings();

    for score in [
        analyze_titles(&pages, &settings).score,
        analyze_meta_descriptions(&pages, &settings).score,
        analyze_headings(&pages, &settings).score,
        analyze_images(&pages, &settings).score,
        analyze_content(&pages, &settings).score,
        analyze_links(&pages, &settings).score,
        analyze_technical(&pages, &settings).score,
        analyze_performance(&pages, &settings).score,
    ] {
        assert!(score <= 100);
    }
    assert_eq!(analyze_titles(&pages, &settings).score, 0);
}
