use eyre::{Result, WrapErr, eyre};
use scraper::Html;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use url::Url;

const USER_AGENT: &str = concat!("hnav/", env!("CARGO_PKG_VERSION"));

/// Where a listing page comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Remote(Url),
    File(PathBuf),
}

impl Location {
    /// Interpret user input as either an http(s) URL or a local file path.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(eyre!("empty location"));
        }
        let lower = input.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let url = Url::parse(input).wrap_err_with(|| format!("invalid URL: {input}"))?;
            return Ok(Location::Remote(url));
        }
        if lower.starts_with("file://") {
            let url = Url::parse(input).wrap_err_with(|| format!("invalid URL: {input}"))?;
            let path = url
                .to_file_path()
                .map_err(|_| eyre!("not a local file URL: {input}"))?;
            return Ok(Location::File(path));
        }
        Ok(Location::File(PathBuf::from(input)))
    }

    /// Base used to resolve relative links found in the document.
    pub fn base_url(&self, site_host: &str) -> Result<Url> {
        match self {
            Location::Remote(url) => Ok(url.clone()),
            Location::File(_) => Url::parse(&format!("https://{site_host}/"))
                .wrap_err_with(|| format!("invalid site host: {site_host}")),
        }
    }

    /// Modification time of a local page; remote pages have none.
    pub fn modified(&self) -> Option<SystemTime> {
        match self {
            Location::File(path) => fs::metadata(path).and_then(|m| m.modified()).ok(),
            Location::Remote(_) => None,
        }
    }

    pub fn display(&self) -> String {
        match self {
            Location::Remote(url) => url.to_string(),
            Location::File(path) => path.display().to_string(),
        }
    }
}

/// One snapshot of a listing page. Row handles taken from it are only valid
/// for this snapshot.
#[derive(Debug)]
pub struct Page {
    location: Location,
    base: Url,
    document: Html,
}

impl Page {
    pub fn parse(location: Location, base: Url, html: &str) -> Self {
        Self {
            location,
            base,
            document: Html::parse_document(html),
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    pub fn site_host(&self) -> &str {
        self.base.host_str().unwrap_or_default()
    }

    /// Resolve an href against the page base. Returns `None` for hrefs that
    /// cannot be turned into an absolute URL.
    pub fn resolve(&self, href: &str) -> Option<Url> {
        self.base.join(href.trim()).ok()
    }

    /// True when `url` points at a different host than the page's site.
    pub fn is_external(&self, url: &Url) -> bool {
        matches!(url.scheme(), "http" | "https")
            && url
                .host_str()
                .is_some_and(|host| !host.eq_ignore_ascii_case(self.site_host()))
    }
}

/// Loads listing pages from the network or from disk.
pub struct Fetcher {
    client: reqwest::blocking::Client,
    site_host: String,
}

impl Fetcher {
    pub fn new(site_host: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            client,
            site_host: site_host.to_string(),
        })
    }

    pub fn fetch(&self, location: &Location) -> Result<Page> {
        let base = location.base_url(&self.site_host)?;
        let html = match location {
            Location::Remote(url) => self
                .client
                .get(url.clone())
                .send()?
                .error_for_status()?
                .text()?,
            Location::File(path) => fs::read_to_string(path)
                .wrap_err_with(|| format!("could not read {}", path.display()))?,
        };
        Ok(Page::parse(location.clone(), base, &html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_location_parse_remote_and_file() {
        let remote = Location::parse("https://news.ycombinator.com/news?p=2").unwrap();
        assert!(matches!(remote, Location::Remote(ref u) if u.host_str() == Some("news.ycombinator.com")));

        let file = Location::parse("  ./front.html ").unwrap();
        assert_eq!(file, Location::File(PathBuf::from("./front.html")));

        assert!(Location::parse("   ").is_err());
    }

    #[test]
    fn test_file_location_resolves_against_site_host() {
        let location = Location::File(PathBuf::from("front.html"));
        let base = location.base_url("news.ycombinator.com").unwrap();
        let page = Page::parse(location, base, "<html></html>");
        assert_eq!(
            page.resolve("item?id=42").unwrap().as_str(),
            "https://news.ycombinator.com/item?id=42"
        );
        assert_eq!(page.site_host(), "news.ycombinator.com");
    }

    #[test]
    fn test_is_external() {
        let location = Location::parse("https://news.ycombinator.com/").unwrap();
        let base = location.base_url("news.ycombinator.com").unwrap();
        let page = Page::parse(location, base, "");
        assert!(page.is_external(&Url::parse("https://a.example/x").unwrap()));
        assert!(!page.is_external(&Url::parse("https://news.ycombinator.com/item?id=1").unwrap()));
        assert!(!page.is_external(&Url::parse("mailto:someone@a.example").unwrap()));
    }

    #[test]
    fn test_fetch_local_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "<table><tr><td>1.</td></tr></table>").unwrap();

        let fetcher = Fetcher::new("news.ycombinator.com").unwrap();
        let location = Location::File(file.path().to_path_buf());
        let page = fetcher.fetch(&location).unwrap();
        assert_eq!(page.location(), &location);
        assert!(location.modified().is_some());
    }

    #[test]
    fn test_fetch_missing_file_fails() {
        let fetcher = Fetcher::new("news.ycombinator.com").unwrap();
        let location = Location::File(PathBuf::from("/nonexistent/hnav/page.html"));
        assert!(fetcher.fetch(&location).is_err());
    }
}
