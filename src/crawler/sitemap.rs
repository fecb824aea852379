//! Sitemap document decoding
//!
//! Two shapes from the sitemap protocol are understood:
//!
//! - `<sitemapindex>` wrapping `<sitemap><loc>..</loc></sitemap>` entries
//! - `<urlset>` wrapping `<url><loc>..</loc></url>` entries
//!
//! Decoding tries the index shape first and the URL-set shape second. A
//! document of either shape with no entries is not accepted as that shape,
//! so an empty index falls through to the URL-set attempt and an empty
//! URL set is unrecognized. Entries without a `<loc>` are dropped one by
//! one; they never invalidate their siblings.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;

/// Root element of a sitemap index
const SITEMAP_INDEX_ROOT: &[u8] = b"sitemapindex";

/// Root element of a URL set
const URL_SET_ROOT: &[u8] = b"urlset";

#[derive(Debug, Deserialize)]
struct Loc {
    #[serde(default)]
    loc: String,
}

#[derive(Debug, Deserialize)]
struct SitemapIndexXml {
    #[serde(rename = "sitemap", default)]
    sitemaps: Vec<Loc>,
}

#[derive(Debug, Deserialize)]
struct UrlSetXml {
    #[serde(rename = "url", default)]
    urls: Vec<Loc>,
}

/// A decoded sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// Locations of further sitemaps, in document order
    Index(Vec<String>),
    /// Locations of content pages, in document order
    UrlSet(Vec<String>),
}

impl SitemapDocument {
    /// Decodes a response body, trying the index shape before the URL-set shape
    ///
    /// # Returns
    ///
    /// * `Some(SitemapDocument)` - The body is a non-empty index or URL set
    /// * `None` - Neither shape decoded with at least one entry
    pub fn decode(body: &[u8]) -> Option<Self> {
        let root = root_element(body)?;

        if let Some(sitemaps) = decode_index(&root, body) {
            return Some(Self::Index(sitemaps));
        }

        decode_url_set(&root, body).map(Self::UrlSet)
    }

    /// Number of entries in the document
    pub fn len(&self) -> usize {
        match self {
            Self::Index(locs) | Self::UrlSet(locs) => locs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn decode_index(root: &[u8], body: &[u8]) -> Option<Vec<String>> {
    if root != SITEMAP_INDEX_ROOT {
        return None;
    }
    let index: SitemapIndexXml = quick_xml::de::from_reader(body).ok()?;
    non_empty(index.sitemaps)
}

fn decode_url_set(root: &[u8], body: &[u8]) -> Option<Vec<String>> {
    if root != URL_SET_ROOT {
        return None;
    }
    let set: UrlSetXml = quick_xml::de::from_reader(body).ok()?;
    non_empty(set.urls)
}

fn non_empty(entries: Vec<Loc>) -> Option<Vec<String>> {
    let total = entries.len();
    let locs: Vec<String> = entries
        .into_iter()
        .map(|e| e.loc.trim().to_string())
        .filter(|loc| !loc.is_empty())
        .collect();

    if locs.len() < total {
        tracing::debug!("Dropped {} sitemap entries without a location", total - locs.len());
    }
    if locs.is_empty() {
        return None;
    }
    Some(locs)
}

/// Returns the local name of the first element in the document
fn root_element(body: &[u8]) -> Option<Vec<u8>> {
    let mut reader = Reader::from_reader(body);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return Some(e.local_name().as_ref().to_vec());
            }
            Ok(Event::Eof) | Err(_) => return None,
            Ok(_) => {}
        }
        buf.clear();
    }
}
