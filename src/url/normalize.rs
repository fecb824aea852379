/// Upgrades an insecure `http://` prefix to the given scheme
///
/// Only a leading `http://` is rewritten; every other string is returned
/// unchanged, including URLs that already carry the target scheme. When
/// `scheme` is `http` the call is a no-op.
///
/// # Examples
///
/// ```
/// use docs_mirror::url::upgrade_scheme;
///
/// assert_eq!(
///     upgrade_scheme("http://docs.example.com/ec2/", "https"),
///     "https://docs.example.com/ec2/"
/// );
/// assert_eq!(
///     upgrade_scheme("https://docs.example.com/", "https"),
///     "https://docs.example.com/"
/// );
/// ```
pub fn upgrade_scheme(url: &str, scheme: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("{}://{}", scheme, rest),
        None => url.to_string(),
    }
}
