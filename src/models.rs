use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// State of an optional HTML attribute such as `alt` or `title`.
///
/// A missing attribute and an attribute set to blank text are scored
/// differently, so both are kept apart from a filled-in value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Attribute {
    #[default]
    Absent,
    Empty,
    Present(String),
}

impl Attribute {
    /// Classifies a raw attribute value; whitespace-only text counts as empty.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None => Attribute::Absent,
            Some(value) if value.trim().is_empty() => Attribute::Empty,
            Some(value) => Attribute::Present(value.to_string()),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Attribute::Absent)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Attribute::Empty)
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Attribute::Present(_))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Attribute::Present(text) => Some(text),
            _ => None,
        }
    }
}

// Serialized as `null` (absent) or a string, the same shape an HTML
// extractor emits, so page dumps can be written by other tools.
impl Serialize for Attribute {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Attribute::Absent => serializer.serialize_none(),
            Attribute::Empty => serializer.serialize_some(""),
            Attribute::Present(text) => serializer.serialize_some(text),
        }
    }
}

impl<'de> Deserialize<'de> for Attribute {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Attribute::from_raw(raw.as_deref()))
    }
}

/// Reads a page field, falling back to its default when the value is
/// `null` or of the wrong type. One bad field must not reject the record.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Facts collected for one crawled page.
///
/// Every field defaults when missing, `null` or mistyped so a partial
/// record still goes through analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    #[serde(deserialize_with = "lenient")]
    pub url: String,
    #[serde(deserialize_with = "lenient")]
    pub title: String,
    #[serde(deserialize_with = "lenient")]
    pub meta_description: String,
    /// Heading text keyed by level (1 for `h1` .. 6 for `h6`), in document order
    #[serde(deserialize_with = "lenient")]
    pub headings: BTreeMap<u8, Vec<String>>,
    #[serde(deserialize_with = "lenient")]
    pub images: Vec<Image>,
    #[serde(deserialize_with = "lenient")]
    pub links: Vec<Link>,
    #[serde(deserialize_with = "lenient")]
    pub content: ContentStats,
    #[serde(deserialize_with = "lenient")]
    pub status_code: u16,
    /// Size of the HTML body in bytes
    #[serde(deserialize_with = "lenient")]
    pub html_size: usize,
    /// Seconds from request to fully read body
    #[serde(deserialize_with = "lenient")]
    pub response_time: f64,
    #[serde(deserialize_with = "lenient")]
    pub canonical_url: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub lang: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub schema_markup: Vec<String>,
}

impl Page {
    pub fn heading_count(&self, level: u8) -> usize {
        self.headings.get(&level).map_or(0, Vec::len)
    }

    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    pub fn has_meta_description(&self) -> bool {
        !self.meta_description.trim().is_empty()
    }

    pub fn has_canonical(&self) -> bool {
        self.canonical_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }

    pub fn has_lang(&self) -> bool {
        self.lang.as_deref().is_some_and(|lang| !lang.trim().is_empty())
    }

    pub fn has_schema(&self) -> bool {
        !self.schema_markup.is_empty()
    }

    pub fn internal_link_count(&self) -> usize {
        self.links.iter().filter(|link| !link.is_external).count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    #[serde(deserialize_with = "lenient")]
    pub src: String,
    #[serde(deserialize_with = "lenient")]
    pub alt: Attribute,
    #[serde(deserialize_with = "lenient")]
    pub title: Attribute,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    #[serde(deserialize_with = "lenient")]
    pub url: String,
    #[serde(deserialize_with = "lenient")]
    pub text: String,
    #[serde(deserialize_with = "lenient")]
    pub is_external: bool,
    #[serde(deserialize_with = "lenient")]
    pub rel: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentStats {
    #[serde(deserialize_with = "lenient")]
    pub word_count: usize,
    /// Visible text length divided by HTML length, 0.0..=1.0
    #[serde(deserialize_with = "lenient")]
    pub text_html_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Notice,
}

/// Stable machine key for every issue the classifier can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    MissingTitle,
    #[serde(rename = "status_5xx")]
    Status5xx,
    #[serde(rename = "status_4xx")]
    Status4xx,
    MissingMetaDescription,
    MissingH1,
    MultipleH1,
    MissingH2,
    MissingH3,
    MissingAlt,
    EmptyAlt,
    MissingImageTitle,
    EmptyImageTitle,
    LowWordCount,
    LowTextHtmlRatio,
    SlowPage,
    LargeHtml,
    MissingCanonical,
    MissingLang,
    MissingSchema,
    DuplicateTitle,
    DuplicateMetaDescription,
    NoSsl,
}

impl IssueType {
    /// Name of the detail list an issue of this type is also recorded in.
    /// Site-level issues have no per-page list.
    pub fn detail_list(self) -> Option<&'static str> {
        let name = match self {
            IssueType::MissingTitle => "pages_without_title",
            IssueType::Status5xx => "status_5xx_pages",
            IssueType::Status4xx => "status_4xx_pages",
            IssueType::MissingMetaDescription => "pages_without_meta",
            IssueType::MissingH1 => "missing_h1_pages",
            IssueType::MultipleH1 => "multiple_h1_pages",
            IssueType::MissingH2 => "missing_h2_pages",
            IssueType::MissingH3 => "missing_h3_pages",
            IssueType::MissingAlt => "images_without_alt",
            IssueType::EmptyAlt => "images_with_empty_alt",
            IssueType::MissingImageTitle => "images_without_title_attr",
            IssueType::EmptyImageTitle => "images_with_empty_title_attr",
            IssueType::LowWordCount => "low_word_count_pages",
            IssueType::LowTextHtmlRatio => "low_text_html_ratio_pages",
            IssueType::SlowPage => "slow_pages",
            IssueType::LargeHtml => "large_html_pages",
            IssueType::MissingCanonical => "pages_without_canonical",
            IssueType::MissingLang => "pages_without_lang",
            IssueType::MissingSchema => "pages_without_schema",
            IssueType::DuplicateTitle => "duplicate_titles",
            IssueType::DuplicateMetaDescription => "duplicate_meta_descriptions",
            IssueType::NoSsl => return None,
        };
        Some(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub url: String,
    pub message: String,
    pub severity: Severity,
    /// The offending resource inside the page, e.g. an image src
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
}

/// Output of the detailed issue classifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IssueReport {
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
    pub notices: Vec<Issue>,
    /// Per-type lists keyed by their detail list name
    pub details: BTreeMap<&'static str, Vec<Issue>>,
}

impl IssueReport {
    pub fn total(&self) -> usize {
        self.errors.len() + self.warnings.len() + self.notices.len()
    }

    pub fn bucket(&self, severity: Severity) -> &[Issue] {
        match severity {
            Severity::Error => &self.errors,
            Severity::Warning => &self.warnings,
            Severity::Notice => &self.notices,
        }
    }

    /// Issues recorded under a detail list name; empty if none were found.
    pub fn detail(&self, list: &str) -> &[Issue] {
        self.details.get(list).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub value: String,
    pub urls: Vec<String>,
    pub count: usize,
}

/// The scored facets of a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Title,
    MetaDescription,
    Headings,
    Images,
    InternalLinks,
    PageSpeed,
    MobileFriendly,
    Ssl,
    Content,
    Technical,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Title,
        Category::MetaDescription,
        Category::Headings,
        Category::Images,
        Category::InternalLinks,
        Category::PageSpeed,
        Category::MobileFriendly,
        Category::Ssl,
        Category::Content,
        Category::Technical,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Title => "Title",
            Category::MetaDescription => "Meta Description",
            Category::Headings => "Headings",
            Category::Images => "Images",
            Category::InternalLinks => "Links",
            Category::PageSpeed => "Performance",
            Category::MobileFriendly => "Mobile",
            Category::Ssl => "SSL",
            Category::Content => "Content",
            Category::Technical => "Technical",
        }
    }
}

/// A page and the length of the text that fell outside the bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LengthFinding {
    pub url: String,
    pub text: String,
    pub length: usize,
}

/// A page and the measured value that crossed a threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMetric {
    pub url: String,
    pub value: f64,
}

/// Shared shape of the title and meta description analyses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagAnalysis {
    pub score: u8,
    pub total_pages: usize,
    pub missing: Vec<String>,
    pub duplicates: Vec<DuplicateGroup>,
    pub too_short: Vec<LengthFinding>,
    pub too_long: Vec<LengthFinding>,
    pub optimal: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadingsAnalysis {
    pub score: u8,
    pub total_pages: usize,
    pub missing_h1: Vec<String>,
    pub multiple_h1: Vec<PageMetric>,
    pub pages_with_h2: usize,
    pub pages_with_h3: usize,
}

/// Counters for one tri-state image attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttributeCounts {
    /// Attribute present, blank or not
    pub with_attribute: usize,
    pub absent: usize,
    pub empty: usize,
    pub filled: usize,
}

impl AttributeCounts {
    pub fn record(&mut self, attribute: &Attribute) {
        match attribute {
            Attribute::Absent => self.absent += 1,
            Attribute::Empty => {
                self.with_attribute += 1;
                self.empty += 1;
            }
            Attribute::Present(_) => {
                self.with_attribute += 1;
                self.filled += 1;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRef {
    pub page_url: String,
    pub src: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImagesAnalysis {
    pub score: u8,
    pub total_pages: usize,
    pub total_images: usize,
    pub alt: AttributeCounts,
    pub title_attr: AttributeCounts,
    pub images_without_alt: Vec<ImageRef>,
    pub images_with_empty_alt: Vec<ImageRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentAnalysis {
    pub score: u8,
    pub total_pages: usize,
    pub low_word_count: Vec<PageMetric>,
    pub low_text_html_ratio: Vec<PageMetric>,
    pub average_word_count: f64,
    pub average_text_html_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRef {
    pub page_url: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinksAnalysis {
    pub score: u8,
    pub total_pages: usize,
    pub total_links: usize,
    pub internal_links: usize,
    pub external_links: usize,
    pub nofollow_links: usize,
    pub pages_with_few_internal_links: Vec<PageMetric>,
    pub empty_anchor_links: Vec<LinkRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnicalAnalysis {
    pub score: u8,
    pub total_pages: usize,
    pub missing_canonical: Vec<String>,
    pub missing_lang: Vec<String>,
    pub missing_schema: Vec<String>,
    pub duplicate_canonicals: Vec<DuplicateGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceAnalysis {
    pub score: u8,
    pub total_pages: usize,
    pub slow_pages: Vec<PageMetric>,
    pub large_pages: Vec<PageMetric>,
    /// Seconds
    pub average_response_time: f64,
    /// Bytes
    pub average_page_size: f64,
}

/// Mobile friendliness is not measured yet; see `categories::analyze_mobile`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MobileAnalysis {
    pub score: u8,
    pub total_pages: usize,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SslAnalysis {
    pub score: u8,
    pub has_ssl: bool,
    /// False when the probe was skipped (nothing was crawled)
    pub checked: bool,
    pub certificate_expires: Option<String>,
    pub error: Option<String>,
}

impl SslAnalysis {
    pub fn unchecked() -> Self {
        Self {
            score: 100,
            has_ssl: false,
            checked: false,
            certificate_expires: None,
            error: None,
        }
    }

    pub fn secure(certificate_expires: Option<String>) -> Self {
        Self {
            score: 100,
            has_ssl: true,
            checked: true,
            certificate_expires,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            score: 0,
            has_ssl: false,
            checked: true,
            certificate_expires: None,
            error: Some(error.into()),
        }
    }

    pub fn is_missing(&self) -> bool {
        self.checked && !self.has_ssl
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Alto,
    Medio,
    Basso,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub category: Category,
    pub priority: Priority,
    pub issue: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub excellent: usize,
    pub good: usize,
    pub needs_improvement: usize,
    pub poor: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub report_title: String,
    pub domain: String,
    pub analysis_date: String,
    pub total_pages_analyzed: usize,
    pub overall_score: u8,
    pub total_issues: usize,
    pub total_recommendations: usize,
    pub score_breakdown: ScoreBreakdown,
}

/// Everything one analysis run produces. Built in a single pass and
/// handed out whole; consumers only read it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub domain: String,
    pub title: TagAnalysis,
    pub meta_description: TagAnalysis,
    pub headings: HeadingsAnalysis,
    pub images: ImagesAnalysis,
    pub content: ContentAnalysis,
    pub links: LinksAnalysis,
    pub technical: TechnicalAnalysis,
    pub performance: PerformanceAnalysis,
    pub mobile: MobileAnalysis,
    pub ssl: SslAnalysis,
    pub issues: IssueReport,
    pub duplicate_titles: Vec<DuplicateGroup>,
    pub duplicate_meta_descriptions: Vec<DuplicateGroup>,
    pub overall_score: u8,
    pub recommendations: Vec<Recommendation>,
    pub summary: Summary,
}

impl AnalysisResult {
    /// The site health percentage is the overall score under another name.
    pub fn site_health(&self) -> u8 {
        self.overall_score
    }

    pub fn category_score(&self, category: Category) -> u8 {
        match category {
            Category::Title => self.title.score,
            Category::MetaDescription => self.meta_description.score,
            Category::Headings => self.headings.score,
            Category::Images => self.images.score,
            Category::InternalLinks => self.links.score,
            Category::PageSpeed => self.performance.score,
            Category::MobileFriendly => self.mobile.score,
            Category::Ssl => self.ssl.score,
            Category::Content => self.content.score,
            Category::Technical => self.technical.score,
        }
    }

    pub fn category_scores(&self) -> Vec<(Category, u8)> {
        Category::ALL
            .iter()
            .map(|&category| (category, self.category_score(category)))
            .collect()
    }
}
