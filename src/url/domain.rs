use url::Url;

/// Extracts the authority (host plus explicit port) from a URL
///
/// The host is lowercased by the URL parser. Default ports are dropped by
/// the parser, so `https://example.com:443/` yields `example.com`.
///
/// # Returns
///
/// * `Some(String)` - The host, followed by `:port` when a non-default port is present
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use docs_mirror::url::extract_authority;
///
/// let url = Url::parse("https://Docs.Example.com/path").unwrap();
/// assert_eq!(extract_authority(&url), Some("docs.example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/path").unwrap();
/// assert_eq!(extract_authority(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_authority(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}
