use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "sitehealth")]
#[command(about = "Crawl a website and score its SEO and technical health", long_about = None)]
pub struct Cli {
    /// The URL to start crawling from
    #[arg(value_name = "URL")]
    pub url: String,

    /// Maximum crawl depth (default: 5)
    #[arg(short, long, default_value_t = 5)]
    pub depth: usize,

    /// Maximum number of pages to crawl (default: 200)
    #[arg(short, long, default_value_t = 200)]
    pub max_pages: usize,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    pub output: String,

    /// Save the JSON report to file
    #[arg(short, long)]
    pub save: Option<String>,

    /// Follow external links
    #[arg(short, long)]
    pub external: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Treat URLs with fragment identifiers (#) as unique links
    #[arg(long)]
    pub keep_fragments: bool,

    /// Rate limit for requests per second (optional, e.g., 1.0 for 1 req/s)
    #[arg(short = 'r', long)]
    pub rate_limit: Option<f64>,

    /// Number of concurrent requests (default: 5)
    #[arg(short = 'c', long, default_value_t = 5)]
    pub concurrency: usize,

    /// Path to configuration file (JSON, TOML, or YAML)
    #[arg(long)]
    pub config: Option<String>,

    /// Analyze pages from a JSON file instead of crawling
    #[arg(long, value_name = "FILE")]
    pub input: Option<String>,

    /// Write the crawled pages to a JSON file
    #[arg(long, value_name = "FILE")]
    pub export_pages: Option<String>,
}
