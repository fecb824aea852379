use crate::config::FilterConfig;
use crate::url::domain::extract_authority;
use crate::url::normalize::upgrade_scheme;
use crate::{UrlError, UrlResult};
use regex::Regex;
use url::Url;

/// Scheme accepted by production filters
pub const SECURE_SCHEME: &str = "https";

/// First path segment that is excluded regardless of configuration
const ALWAYS_EXCLUDED_SEGMENT: &str = "cdk";

/// Matches a localized tree such as `/de_de/` or `/ja_jp/`
const LOCALE_SEGMENT: &str = "[a-z]{2}_[a-z]{2}";

/// Outcome of running a URL through the filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// URL passes every rule and may be fetched
    Include,
    /// URL does not use the accepted scheme
    WrongScheme,
    /// URL lives on a different host
    ForeignHost,
    /// URL matches the exclusion pattern
    Excluded,
}

impl Verdict {
    /// Returns true if the URL should be fetched
    pub fn is_included(&self) -> bool {
        matches!(self, Self::Include)
    }
}

/// Immutable inclusion predicate for candidate URLs
///
/// Rules are applied in order and the first failing rule rejects:
///
/// 1. The scheme must equal the accepted scheme (`https` in production)
/// 2. The authority must equal the configured host exactly
/// 3. The URL must not start a path with an excluded first segment:
///    a locale pair, `cdk`, or one of the configured SDK trees
///
/// A filter is built once and shared by reference; it holds no mutable state.
#[derive(Debug, Clone)]
pub struct Filter {
    scheme: String,
    host: String,
    exclusion: Regex,
}

impl Filter {
    /// Builds a filter that accepts only `https` URLs
    pub fn new(config: &FilterConfig) -> Result<Self, regex::Error> {
        Self::with_scheme(config, SECURE_SCHEME)
    }

    /// Builds a filter that accepts the given scheme instead of `https`
    ///
    /// The exclusion pattern is anchored on the same scheme. Mock servers
    /// that only speak plain HTTP use `with_scheme(config, "http")`.
    pub fn with_scheme(config: &FilterConfig, scheme: &str) -> Result<Self, regex::Error> {
        let mut alternatives: Vec<String> = Vec::new();
        if config.exclude_locales {
            alternatives.push(LOCALE_SEGMENT.to_string());
        }
        alternatives.push(ALWAYS_EXCLUDED_SEGMENT.to_string());
        alternatives.extend(config.excluded_segments.iter().map(|s| regex::escape(s)));

        // Parsed authorities are lowercase, so the configured host must be too
        let host = config.host.to_ascii_lowercase();
        let pattern = format!(
            "^{}://{}/(?:{})/",
            regex::escape(scheme),
            regex::escape(&host),
            alternatives.join("|")
        );

        Ok(Self {
            scheme: scheme.to_string(),
            host,
            exclusion: Regex::new(&pattern)?,
        })
    }

    /// The scheme this filter accepts
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The host this filter accepts
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Rewrites a leading `http://` to the accepted scheme
    pub fn normalize(&self, url: &str) -> String {
        upgrade_scheme(url, &self.scheme)
    }

    /// Classifies a URL against the filter rules
    ///
    /// # Returns
    ///
    /// * `Ok(Verdict)` - Which rule, if any, rejected the URL
    /// * `Err(UrlError)` - The URL is not a valid absolute URL
    pub fn classify(&self, url: &str) -> UrlResult<Verdict> {
        let parsed = Url::parse(url).map_err(|e| UrlError::Parse(format!("{}: {}", url, e)))?;

        if parsed.scheme() != self.scheme {
            return Ok(Verdict::WrongScheme);
        }

        let authority =
            extract_authority(&parsed).ok_or_else(|| UrlError::MissingHost(url.to_string()))?;
        if authority != self.host {
            return Ok(Verdict::ForeignHost);
        }

        // Match on the canonical form so host case and default ports don't matter
        let canonical = format!("{}://{}{}", parsed.scheme(), authority, parsed.path());
        if self.exclusion.is_match(&canonical) {
            return Ok(Verdict::Excluded);
        }

        Ok(Verdict::Include)
    }

    /// Returns true if the URL should be fetched
    ///
    /// Malformed URLs are never included.
    pub fn should_include(&self, url: &str) -> bool {
        matches!(self.classify(url), Ok(Verdict::Include))
    }
}
