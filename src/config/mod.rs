//! Configuration module for Docs-Mirror
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so an empty file describes the stock mirror.
//!
//! # Example
//!
//! ```no_run
//! use docs_mirror::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("mirror.toml")).unwrap();
//! println!("Mirror will use {} workers", config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, FetcherConfig, FilterConfig, OutputConfig, DEFAULT_EXCLUDED_SEGMENTS,
    DEFAULT_HOST, DEFAULT_SITEMAP_URL, DEFAULT_USER_AGENTS,
};

pub use parser::{load_config, parse_config};
pub use validation::validate;
