use crate::models::{
    Category, ContentAnalysis, HeadingsAnalysis, ImagesAnalysis, IssueReport, LinksAnalysis,
    PerformanceAnalysis, Priority, Recommendation, SslAnalysis, TagAnalysis, TechnicalAnalysis,
};

/// The finished analyses recommendations are derived from.
pub struct RecommendationInput<'a> {
    pub title: &'a TagAnalysis,
    pub meta_description: &'a TagAnalysis,
    pub headings: &'a HeadingsAnalysis,
    pub images: &'a ImagesAnalysis,
    pub content: &'a ContentAnalysis,
    pub links: &'a LinksAnalysis,
    pub technical: &'a TechnicalAnalysis,
    pub performance: &'a PerformanceAnalysis,
    pub ssl: &'a SslAnalysis,
    pub issues: &'a IssueReport,
}

struct Rule {
    category: Category,
    priority: Priority,
    count: fn(&RecommendationInput) -> usize,
    issue: fn(usize) -> String,
    recommendation: &'static str,
}

// Rules fire in table order; priority belongs to the rule.
static RULES: &[Rule] = &[
    Rule {
        category: Category::Title,
        priority: Priority::Alto,
        count: |input| input.title.missing.len(),
        issue: |n| format!("{} pages without a title tag", n),
        recommendation: "Add a unique, descriptive <title> to every page.",
    },
    Rule {
        category: Category::Technical,
        priority: Priority::Alto,
        count: |input| {
            input.issues.detail("status_4xx_pages").len()
                + input.issues.detail("status_5xx_pages").len()
        },
        issue: |n| format!("{} pages returned an HTTP error", n),
        recommendation: "Fix or redirect pages that return 4xx or 5xx status codes.",
    },
    Rule {
        category: Category::Ssl,
        priority: Priority::Alto,
        count: |input| usize::from(input.ssl.is_missing()),
        issue: |_| "The site does not serve a valid HTTPS connection".to_string(),
        recommendation: "Install a valid TLS certificate and serve the site over HTTPS.",
    },
    Rule {
        category: Category::Images,
        priority: Priority::Alto,
        count: |input| input.images.alt.absent,
        issue: |n| format!("{} images without an alt attribute", n),
        recommendation: "Describe every meaningful image with an alt attribute.",
    },
    Rule {
        category: Category::PageSpeed,
        priority: Priority::Alto,
        count: |input| input.performance.slow_pages.len(),
        issue: |n| format!("{} slow pages", n),
        recommendation: "Reduce server response time with caching and lighter pages.",
    },
    Rule {
        category: Category::MetaDescription,
        priority: Priority::Alto,
        count: |input| input.meta_description.missing.len(),
        issue: |n| format!("{} pages without a meta description", n),
        recommendation: "Write a meta description that summarizes each page.",
    },
    Rule {
        category: Category::Headings,
        priority: Priority::Alto,
        count: |input| input.headings.missing_h1.len(),
        issue: |n| format!("{} pages without an H1 heading", n),
        recommendation: "Give every page a single H1 that states its topic.",
    },
    Rule {
        category: Category::Title,
        priority: Priority::Medio,
        count: |input| input.title.duplicates.len(),
        issue: |n| format!("{} titles shared by several pages", n),
        recommendation: "Make each title unique to the page it belongs to.",
    },
    Rule {
        category: Category::MetaDescription,
        priority: Priority::Medio,
        count: |input| input.meta_description.duplicates.len(),
        issue: |n| format!("{} meta descriptions shared by several pages", n),
        recommendation: "Write a distinct meta description for each page.",
    },
    Rule {
        category: Category::Headings,
        priority: Priority::Medio,
        count: |input| input.headings.multiple_h1.len(),
        issue: |n| format!("{} pages with more than one H1", n),
        recommendation: "Keep one H1 per page and demote the others to H2.",
    },
    Rule {
        category: Category::Images,
        priority: Priority::Medio,
        count: |input| input.images.alt.empty,
        issue: |n| format!("{} images with an empty alt attribute", n),
        recommendation: "Fill in alt text unless the image is purely decorative.",
    },
    Rule {
        category: Category::Content,
        priority: Priority::Medio,
        count: |input| input.content.low_word_count.len(),
        issue: |n| format!("{} pages with thin content", n),
        recommendation: "Expand thin pages with useful, original text.",
    },
    Rule {
        category: Category::PageSpeed,
        priority: Priority::Medio,
        count: |input| input.performance.large_pages.len(),
        issue: |n| format!("{} pages with oversized HTML", n),
        recommendation: "Trim inline scripts, styles and markup from heavy pages.",
    },
    Rule {
        category: Category::Title,
        priority: Priority::Basso,
        count: |input| input.title.too_short.len() + input.title.too_long.len(),
        issue: |n| format!("{} titles outside the recommended length", n),
        recommendation: "Keep titles within the recommended character range.",
    },
    Rule {
        category: Category::MetaDescription,
        priority: Priority::Basso,
        count: |input| {
            input.meta_description.too_short.len() + input.meta_description.too_long.len()
        },
        issue: |n| format!("{} meta descriptions outside the recommended length", n),
        recommendation: "Keep meta descriptions within the recommended character range.",
    },
    Rule {
        category: Category::Content,
        priority: Priority::Basso,
        count: |input| input.content.low_text_html_ratio.len(),
        issue: |n| format!("{} pages with a low text to HTML ratio", n),
        recommendation: "Increase visible text relative to markup.",
    },
    Rule {
        category: Category::InternalLinks,
        priority: Priority::Basso,
        count: |input| input.links.pages_with_few_internal_links.len(),
        issue: |n| format!("{} pages with few internal links", n),
        recommendation: "Link related pages to each other to spread authority.",
    },
    Rule {
        category: Category::InternalLinks,
        priority: Priority::Basso,
        count: |input| input.links.empty_anchor_links.len(),
        issue: |n| format!("{} links without anchor text", n),
        recommendation: "Use descriptive anchor text on every link.",
    },
    Rule {
        category: Category::Technical,
        priority: Priority::Basso,
        count: |input| input.technical.missing_canonical.len(),
        issue: |n| format!("{} pages without a canonical URL", n),
        recommendation: "Declare a canonical URL with <link rel=\"canonical\">.",
    },
    Rule {
        category: Category::Technical,
        priority: Priority::Basso,
        count: |input| input.technical.missing_lang.len(),
        issue: |n| format!("{} pages without a lang attribute", n),
        recommendation: "Set the lang attribute on the <html> element.",
    },
    Rule {
        category: Category::Technical,
        priority: Priority::Basso,
        count: |input| input.technical.missing_schema.len(),
        issue: |n| format!("{} pages without structured data", n),
        recommendation: "Add schema.org markup (JSON-LD) describing the page.",
    },
];

pub fn generate(input: &RecommendationInput) -> Vec<Recommendation> {
    RULES
        .iter()
        .filter_map(|rule| {
            let count = (rule.count)(input);
            (count > 0).then(|| Recommendation {
                category: rule.category,
                priority: rule.priority,
                issue: (rule.issue)(count),
                recommendation: rule.recommendation.to_string(),
            })
        })
        .collect()
}
