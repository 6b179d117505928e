use url::Url;

/// Image URL shipped in sample configurations in place of a real picture.
pub const DEFAULT_PLACEHOLDER_URL: &str = "https://example.com/image.jpg";

/// Decides which `image_url` values are stand-ins that must never reach the
/// remote service.
///
/// A URL is a placeholder when it equals one of the configured URLs, or when it
/// is served from the same host as one of them. Scheme and port are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderPolicy {
    urls: Vec<String>,
}

impl Default for PlaceholderPolicy {
    fn default() -> Self {
        Self::new([DEFAULT_PLACEHOLDER_URL])
    }
}

impl PlaceholderPolicy {
    pub fn new<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            urls: urls
                .into_iter()
                .map(Into::into)
                .filter(|url: &String| !url.trim().is_empty())
                .collect(),
        }
    }

    /// Policy that treats every URL as real.
    pub fn disabled() -> Self {
        Self { urls: Vec::new() }
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn is_placeholder(&self, url: &str) -> bool {
        let url = url.trim();
        let url_host = host(url);
        self.urls.iter().any(|candidate| {
            url == candidate
                || url_host
                    .as_deref()
                    .is_some_and(|url_host| host(candidate).as_deref() == Some(url_host))
        })
    }

    /// Returns the URL when it may be forwarded as an image attachment.
    pub fn filter<'a>(&self, url: Option<&'a str>) -> Option<&'a str> {
        url.map(str::trim)
            .filter(|url| !url.is_empty() && !self.is_placeholder(url))
    }
}

/// Host of `url`, lowercased by the parser; `None` when it has none.
fn host(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .host_str()
        .filter(|host| !host.is_empty())
        .map(str::to_owned)
}
