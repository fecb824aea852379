use serde::Deserialize;

/// Root sitemap of the mirrored documentation site
pub const DEFAULT_SITEMAP_URL: &str = "https://docs.aws.amazon.com/sitemap_index.xml";

/// Host every mirrored URL must live on
pub const DEFAULT_HOST: &str = "docs.aws.amazon.com";

/// SDK and language-binding reference trees that are never mirrored
pub const DEFAULT_EXCLUDED_SEGMENTS: &[&str] = &[
    "AWSJavaSDK",
    "AWSJavaScriptSDK",
    "CDI-SDK",
    "aws-sdk-php",
    "chime-sdk",
    "database-encryption-sdk",
    "embedded-csdk",
    "encryption-sdk",
    "pythonsdk",
    "sdk-for-android",
    "sdk-for-cpp",
    "sdk-for-go",
    "sdk-for-ios",
    "sdk-for-java",
    "sdk-for-javascript",
    "sdk-for-kotlin",
    "sdk-for-net",
    "sdk-for-php",
    "sdk-for-php1",
    "sdk-for-ruby",
    "sdk-for-rust",
    "sdk-for-sapabap",
    "sdk-for-swift",
    "sdk-for-unity",
    "sdkfornet",
    "sdkfornet1",
    "sdkref",
    "xray-sdk-for-java",
];

/// Client identities rotated between fetch attempts
pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:102.0) Gecko/20100101 Firefox/102.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.5 Safari/605.1.15",
];

/// Main configuration structure for Docs-Mirror
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub fetcher: FetcherConfig,
    pub filter: FilterConfig,
    pub output: OutputConfig,
}

/// Crawl pipeline configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Root sitemap the walk starts from
    pub sitemap_url: String,

    /// Number of concurrent download workers
    pub workers: usize,

    /// Maximum URLs queued per URL-set document (0 = unlimited)
    pub document_limit: usize,

    /// Whether each worker pauses after every URL
    pub rate_limit: bool,

    /// Pause applied by each worker when rate limiting is enabled (milliseconds)
    pub rate_limit_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            sitemap_url: DEFAULT_SITEMAP_URL.to_string(),
            workers: 10,
            document_limit: 0,
            rate_limit: false,
            rate_limit_delay_ms: 2000,
        }
    }
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetcherConfig {
    /// Attempts made for one URL before giving up
    pub max_attempts: u32,

    /// Sleep after a rate-limit response or temporary failure (milliseconds)
    pub backoff_ms: u64,

    /// Whole-request timeout (seconds)
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    pub connect_timeout_secs: u64,

    /// Pool of User-Agent strings, one picked at random per attempt
    pub user_agents: Vec<String>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff_ms: 3000,
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agents: DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// URL filter configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FilterConfig {
    /// Host (with optional port) every URL must match exactly
    pub host: String,

    /// First path segments that are never mirrored
    pub excluded_segments: Vec<String>,

    /// Whether localized trees (`xx_yy` first segments) are excluded
    pub exclude_locales: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            excluded_segments: DEFAULT_EXCLUDED_SEGMENTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            exclude_locales: true,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Root of the date-partitioned mirror tree
    pub base_dir: String,

    /// File name used for URLs ending in `/`
    pub index_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_dir: "aws_html".to_string(),
            index_file: "index.html".to_string(),
        }
    }
}
