//! URL handling module for Docs-Mirror
//!
//! This module provides scheme normalization, authority extraction, and the
//! inclusion filter applied to every sitemap and page URL.

mod domain;
mod filter;
mod normalize;

// Re-export main types and functions
pub use domain::extract_authority;
pub use filter::{Filter, Verdict, SECURE_SCHEME};
pub use normalize::upgrade_scheme;
