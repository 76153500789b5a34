use crate::http_client::build_http_client;
use crate::models::{Attribute, ContentStats, Image, Link, Page};
use anyhow::{Context, Result, anyhow};
use futures::stream::{self, StreamExt};
use governor::{
    Quota, RateLimiter, clock::DefaultClock, state::InMemoryState, state::direct::NotKeyed,
};
use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::num::NonZeroU32;
use std::time::Instant;
use url::Url;

/// Configuration for the crawler
pub struct CrawlerConfig {
    pub max_depth: usize,
    pub max_pages: usize,
    pub follow_external: bool,
    pub keep_fragments: bool,
    pub requests_per_second: Option<f64>,
    pub concurrent_requests: usize,
}

// Cached selectors to avoid repeated parsing and eliminate unwrap() calls
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("title selector should be valid"));
static META_DESC_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("meta[name='description']").expect("meta description selector should be valid")
});
static HEADING_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6").expect("heading selector should be valid")
});
static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img[src]").expect("img[src] selector should be valid"));
static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("a[href] selector should be valid"));
static CANONICAL_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("link[rel='canonical']").expect("canonical selector should be valid")
});
static HTML_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("html").expect("html selector should be valid"));
static BODY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("body selector should be valid"));
static JSON_LD_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("script[type='application/ld+json']")
        .expect("json-ld selector should be valid")
});
static ITEMTYPE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[itemtype]").expect("itemtype selector should be valid"));

pub struct Crawler {
    client: reqwest::Client,
    base_url: Url,
    max_depth: usize,
    max_pages: usize,
    follow_external: bool,
    keep_fragments: bool,
    visited: HashSet<String>,
    to_visit: VecDeque<(String, usize)>,
    /// Pages in the order they were crawled
    pub pages: Vec<Page>,
    rate_limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    concurrent_requests: usize,
    progress_bar: Option<ProgressBar>,
}

impl Crawler {
    pub fn new(start_url: &str, config: CrawlerConfig) -> Result<Self> {
        let base_url = Url::parse(start_url).context("Invalid URL")?;

        // Validate URL scheme - only allow http and https
        match base_url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(anyhow!(
                    "Invalid URL scheme '{}': only http and https are supported",
                    scheme
                ));
            }
        }

        let mut to_visit = VecDeque::new();
        to_visit.push_back((base_url.to_string(), 0));

        // Rates below one request per second round up to one
        let rate_limiter = config.requests_per_second.and_then(|rps| {
            NonZeroU32::new(rps.ceil().max(1.0) as u32)
                .map(|per_second| RateLimiter::direct(Quota::per_second(per_second)))
        });

        Ok(Self {
            client: build_http_client(30)?,
            base_url,
            max_depth: config.max_depth,
            max_pages: config.max_pages,
            follow_external: config.follow_external,
            keep_fragments: config.keep_fragments,
            visited: HashSet::new(),
            to_visit,
            pages: Vec::new(),
            rate_limiter,
            concurrent_requests: config.concurrent_requests.max(1),
            progress_bar: None,
        })
    }

    /// Enable progress bar for crawling
    pub fn enable_progress_bar(&mut self) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("[{elapsed_precise}] {spinner:.cyan} Crawling: {pos} pages")
                .expect("Progress bar template should be valid"),
        );
        self.progress_bar = Some(pb);
    }

    /// Normalizes a URL by optionally removing fragment identifiers
    fn normalize_url(&self, url: &str) -> String {
        if self.keep_fragments {
            return url.to_string();
        }
        match url.find('#') {
            Some(pos) => url[..pos].to_string(),
            None => url.to_string(),
        }
    }

    /// Checks if a URL is external by comparing host and port with base_url
    fn is_external_url(&self, url: &Url) -> bool {
        url.host_str() != self.base_url.host_str() || url.port() != self.base_url.port()
    }

    pub async fn crawl(&mut self) -> Result<()> {
        if let Some(ref pb) = self.progress_bar {
            pb.set_position(0);
        }

        while !self.to_visit.is_empty() && self.visited.len() < self.max_pages {
            // Collect up to concurrent_requests URLs to fetch
            let mut batch = Vec::new();
            while let Some((url, depth)) = self.to_visit.pop_front() {
                let normalized_url = self.normalize_url(&url);

                if self.visited.contains(&normalized_url) || depth > self.max_depth {
                    continue;
                }

                // `visited` already counts the batch
                if self.visited.len() >= self.max_pages {
                    break;
                }

                self.visited.insert(normalized_url.clone());
                batch.push((normalized_url, depth));

                if batch.len() >= self.concurrent_requests {
                    break;
                }
            }

            if batch.is_empty() {
                break;
            }

            // `buffered` keeps results in batch order so the page list is stable
            let results = stream::iter(&batch)
                .map(|(url, _)| self.fetch_page(url))
                .buffered(self.concurrent_requests)
                .collect::<Vec<_>>()
                .await;

            for ((url, depth), result) in batch.into_iter().zip(results) {
                match result {
                    Ok(Some(page)) => {
                        if depth < self.max_depth {
                            for link in &page.links {
                                if !link.is_external || self.follow_external {
                                    let normalized_link_url = self.normalize_url(&link.url);
                                    if !self.visited.contains(&normalized_link_url) {
                                        self.to_visit.push_back((link.url.clone(), depth + 1));
                                    }
                                }
                            }
                        }
                        self.pages.push(page);
                    }
                    Ok(None) => {
                        tracing::debug!(url = %url, "Skipping non-HTML response");
                    }
                    Err(e) => {
                        tracing::error!(url = %url, error = %e, "Failed to crawl page");
                    }
                }
            }

            if let Some(ref pb) = self.progress_bar {
                pb.set_position(self.pages.len() as u64);
            }
        }

        if let Some(ref pb) = self.progress_bar {
            pb.finish_with_message(format!("Crawled {} pages", self.pages.len()));
        }

        Ok(())
    }

    /// Fetches one URL. Returns `None` for responses that are not HTML.
    async fn fetch_page(&self, url: &str) -> Result<Option<Page>> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        let started = Instant::now();
        let response = self.client.get(url).send().await?;
        let status_code = response.status().as_u16();

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_lowercase());

        if let Some(ct) = &content_type
            && !ct.contains("text/html")
            && !ct.contains("application/xhtml")
        {
            return Ok(None);
        }

        let html_content = response.text().await?;
        let response_time = started.elapsed().as_secs_f64();
        let page_url = Url::parse(url)?;

        Ok(Some(self.extract_page(
            url,
            &page_url,
            &html_content,
            status_code,
            response_time,
        )))
    }

    /// Builds the page facts from a fetched HTML document.
    pub fn extract_page(
        &self,
        url: &str,
        page_url: &Url,
        html_content: &str,
        status_code: u16,
        response_time: f64,
    ) -> Page {
        let document = Html::parse_document(html_content);

        Page {
            url: url.to_string(),
            title: extract_title(&document),
            meta_description: extract_meta_description(&document),
            headings: extract_headings(&document),
            images: extract_images(&document, page_url),
            links: self.extract_links(&document, page_url),
            content: extract_content_stats(&document, html_content),
            status_code,
            html_size: html_content.len(),
            response_time,
            canonical_url: extract_canonical(&document, page_url),
            lang: extract_lang(&document),
            schema_markup: extract_schema_types(&document),
        }
    }

    fn extract_links(&self, document: &Html, page_url: &Url) -> Vec<Link> {
        document
            .select(&ANCHOR_SELECTOR)
            .filter_map(|element| {
                let href = element.value().attr("href")?;
                let absolute_url = page_url.join(href).ok()?;
                if !matches!(absolute_url.scheme(), "http" | "https") {
                    return None;
                }
                Some(Link {
                    is_external: self.is_external_url(&absolute_url),
                    url: absolute_url.to_string(),
                    text: element_text(&element),
                    rel: element.value().attr("rel").unwrap_or_default().to_string(),
                })
            })
            .collect()
    }
}

fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn extract_title(document: &Html) -> String {
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

fn extract_meta_description(document: &Html) -> String {
    document
        .select(&META_DESC_SELECTOR)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn extract_headings(document: &Html) -> BTreeMap<u8, Vec<String>> {
    let mut headings: BTreeMap<u8, Vec<String>> = BTreeMap::new();
    for element in document.select(&HEADING_SELECTOR) {
        let level = element
            .value()
            .name()
            .strip_prefix('h')
            .and_then(|digit| digit.parse::<u8>().ok());
        if let Some(level) = level {
            headings.entry(level).or_default().push(element_text(&element));
        }
    }
    headings
}

fn extract_images(document: &Html, page_url: &Url) -> Vec<Image> {
    document
        .select(&IMG_SELECTOR)
        .filter_map(|element| {
            let src = element.value().attr("src")?;
            let absolute_url = page_url.join(src).ok()?;
            Some(Image {
                src: absolute_url.to_string(),
                alt: Attribute::from_raw(element.value().attr("alt")),
                title: Attribute::from_raw(element.value().attr("title")),
            })
        })
        .collect()
}

/// Word count of the visible body text and its share of the raw HTML.
fn extract_content_stats(document: &Html, html_content: &str) -> ContentStats {
    let text = document
        .select(&BODY_SELECTOR)
        .next()
        .map(|body| {
            body.descendants()
                .filter_map(|node| {
                    let text = node.value().as_text()?;
                    let parent = node.parent().and_then(ElementRef::wrap)?;
                    (!matches!(parent.value().name(), "script" | "style" | "noscript"))
                        .then(|| text.to_string())
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    let words: Vec<&str> = text.split_whitespace().collect();
    // Words rejoined with single spaces
    let visible_len =
        words.iter().map(|w| w.len()).sum::<usize>() + words.len().saturating_sub(1);

    ContentStats {
        word_count: words.len(),
        text_html_ratio: if html_content.is_empty() {
            0.0
        } else {
            visible_len as f64 / html_content.len() as f64
        },
    }
}

fn extract_canonical(document: &Html, page_url: &Url) -> Option<String> {
    let href = document
        .select(&CANONICAL_SELECTOR)
        .next()?
        .value()
        .attr("href")?
        .trim();
    if href.is_empty() {
        return None;
    }
    Some(
        page_url
            .join(href)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| href.to_string()),
    )
}

fn extract_lang(document: &Html) -> Option<String> {
    document
        .select(&HTML_SELECTOR)
        .next()?
        .value()
        .attr("lang")
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
}

/// Schema types from JSON-LD `@type` values and microdata `itemtype`.
fn extract_schema_types(document: &Html) -> Vec<String> {
    let mut types = Vec::new();

    for script in document.select(&JSON_LD_SELECTOR) {
        let raw = script.text().collect::<String>();
        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) => collect_json_ld_types(&value, &mut types),
            Err(e) => tracing::debug!(error = %e, "Ignoring malformed JSON-LD block"),
        }
    }

    for element in document.select(&ITEMTYPE_SELECTOR) {
        if let Some(itemtype) = element.value().attr("itemtype") {
            types.extend(itemtype.split_whitespace().map(str::to_string));
        }
    }

    types
}

fn collect_json_ld_types(value: &serde_json::Value, types: &mut Vec<String>) {
    match value {
        serde_json::Value::Array(items) => {
            for item in items {
                collect_json_ld_types(item, types);
            }
        }
        serde_json::Value::Object(map) => {
            match map.get("@type") {
                Some(serde_json::Value::String(kind)) => types.push(kind.clone()),
                Some(serde_json::Value::Array(kinds)) => types.extend(
                    kinds
                        .iter()
                        .filter_map(|kind| kind.as_str().map(str::to_string)),
                ),
                _ => {}
            }
            if let Some(graph) = map.get("@graph") {
                collect_json_ld_types(graph, types);
            }
        }
        _ => {}
    }
}
