#![allow(dead_code)]

use sitehealth::models::{Attribute, ContentStats, Image, Link, Page};
use std::collections::BTreeMap;

/// A page that trips none of the default checks.
///
/// Keep `url` short (under ~30 chars) so the generated title and meta
/// description stay within the default length bounds.
pub fn healthy_page(url: &str) -> Page {
    let mut headings = BTreeMap::new();
    headings.insert(1, vec!["Main heading".to_string()]);
    headings.insert(2, vec!["Section".to_string()]);
    headings.insert(3, vec!["Subsection".to_string()]);

    Page {
        url: url.to_string(),
        title: format!("A well sized page title for {}", url),
        meta_description: format!("Meta description for {} {}", url, "word ".repeat(20))
            .trim()
            .to_string(),
        headings,
        images: vec![image("/img/hero.jpg", Some("Hero"), Some("Hero"))],
        links: (1..=3)
            .map(|n| link(&format!("https://example.com/link-{}", n), "Read more", false))
            .collect(),
        content: ContentStats {
            word_count: 800,
            text_html_ratio: 0.4,
        },
        status_code: 200,
        html_size: 40_000,
        response_time: 0.4,
        canonical_url: Some(url.to_string()),
        lang: Some("en".to_string()),
        schema_markup: vec!["WebPage".to_string()],
    }
}

/// A page that fails nearly every check.
pub fn broken_page(url: &str) -> Page {
    Page {
        url: url.to_string(),
        images: vec![image("/img/a.jpg", None, None), image("/img/b.jpg", Some(""), Some(""))],
        links: vec![link("https://example.com/x", "", false)],
        status_code: 500,
        html_size: 5 * 1024 * 1024,
        response_time: 8.0,
        ..Default::default()
    }
}

pub fn image(src: &str, alt: Option<&str>, title: Option<&str>) -> Image {
    Image {
        src: src.to_string(),
        alt: Attribute::from_raw(alt),
        title: Attribute::from_raw(title),
    }
}

pub fn link(url: &str, text: &str, is_external: bool) -> Link {
    Link {
        url: url.to_string(),
        text: text.to_string(),
        is_external,
        rel: String::new(),
    }
}
