use crate::config::types::{Config, CrawlerConfig, FetcherConfig, FilterConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on concurrent download workers
const MAX_WORKERS: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_filter_config(&config.filter)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawl pipeline configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    let url = Url::parse(&config.sitemap_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid sitemap_url '{}': {}", config.sitemap_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "sitemap_url '{}' must use HTTP or HTTPS",
            config.sitemap_url
        )));
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    if config.user_agents.is_empty() {
        return Err(ConfigError::Validation(
            "user_agents cannot be empty".to_string(),
        ));
    }

    if config.user_agents.iter().any(|ua| ua.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "user_agents cannot contain an empty entry".to_string(),
        ));
    }

    Ok(())
}

/// Validates filter configuration
fn validate_filter_config(config: &FilterConfig) -> Result<(), ConfigError> {
    if config.host.is_empty() {
        return Err(ConfigError::Validation("host cannot be empty".to_string()));
    }

    if config.host.contains("://") || config.host.contains('/') {
        return Err(ConfigError::Validation(format!(
            "host must be a bare host name without scheme or path, got '{}'",
            config.host
        )));
    }

    if config.host.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ConfigError::Validation(format!(
            "host must be lowercase, got '{}'",
            config.host
        )));
    }

    for segment in &config.excluded_segments {
        if segment.is_empty() || segment.contains('/') {
            return Err(ConfigError::Validation(format!(
                "excluded segment must be a single non-empty path segment, got '{}'",
                segment
            )));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.base_dir.is_empty() {
        return Err(ConfigError::Validation(
            "base_dir cannot be empty".to_string(),
        ));
    }

    if config.index_file.is_empty() || config.index_file.contains('/') {
        return Err(ConfigError::Validation(format!(
            "index_file must be a plain file name, got '{}'",
            config.index_file
        )));
    }

    Ok(())
}
