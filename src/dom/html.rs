use std::collections::HashMap;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::{Browser, Element, Page};

/// Static HTML snapshots, fetched over HTTP or served from memory.
///
/// Snapshots never run scripts: clicks succeed without changing the document and pauses
/// return immediately. Pages rendered client-side need `ChromeBrowser` instead.
pub struct HtmlBrowser {
    source: Source,
}

enum Source {
    Http(reqwest::blocking::Client),
    Fixtures(HashMap<String, String>),
}

impl HtmlBrowser {
    pub fn http() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("unifi-typegen/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            source: Source::Http(client),
        })
    }

    /// Serve pages from an in-memory url -> html map.
    pub fn fixtures(pages: HashMap<String, String>) -> Self {
        Self {
            source: Source::Fixtures(pages),
        }
    }
}

impl Browser for HtmlBrowser {
    type Page = HtmlPage;

    fn open(&self, url: &str) -> Result<HtmlPage> {
        let body = match &self.source {
            Source::Http(client) => client
                .get(url)
                .send()
                .and_then(|r| r.error_for_status())
                .and_then(|r| r.text())
                .with_context(|| format!("Failed to fetch {}", url))?,
            Source::Fixtures(pages) => pages
                .get(url)
                .cloned()
                .ok_or_else(|| anyhow!("No page at {}", url))?,
        };
        Ok(HtmlPage::parse(&body))
    }
}

pub struct HtmlPage {
    document: Html,
}

impl HtmlPage {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }
}

impl Page for HtmlPage {
    type Element<'a> = HtmlElement<'a>;

    fn find_all(&self, selector: &str) -> Vec<HtmlElement<'_>> {
        let Some(sel) = parse_selector(selector) else {
            return Vec::new();
        };
        self.document.select(&sel).map(HtmlElement).collect()
    }

    fn wait_for_load(&self) -> Result<()> {
        Ok(())
    }

    fn pause(&self, _duration: Duration) {}
}

#[derive(Clone, Copy)]
pub struct HtmlElement<'a>(ElementRef<'a>);

impl Element for HtmlElement<'_> {
    fn text(&self) -> String {
        let raw: String = self.0.text().collect();
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.value().attr(name).map(str::to_string)
    }

    fn find_all(&self, selector: &str) -> Vec<Self> {
        let Some(sel) = parse_selector(selector) else {
            return Vec::new();
        };
        self.0.select(&sel).map(HtmlElement).collect()
    }

    fn click(&self) -> Result<()> {
        debug!(element = self.0.value().name(), "Click on static snapshot has no effect");
        Ok(())
    }

    fn is_visible(&self) -> bool {
        std::iter::once(self.0)
            .chain(self.0.ancestors().filter_map(ElementRef::wrap))
            .all(|el| !is_hidden(el))
    }
}

fn is_hidden(el: ElementRef<'_>) -> bool {
    let value = el.value();
    if value.attr("hidden").is_some() {
        return true;
    }
    value
        .attr("style")
        .map(|s| s.replace(' ', "").to_lowercase().contains("display:none"))
        .unwrap_or(false)
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(sel) => Some(sel),
        Err(e) => {
            debug!(selector, error = %e, "Unparseable selector");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
        <html><body>
          <nav><a href="/a">First</a><a href="/b" hidden>Second</a></nav>
          <div style="display: none"><button>Ghost</button></div>
          <section><h2>  Request
              Body </h2></section>
        </body></html>
    "#;

    #[test]
    fn text_collapses_whitespace() {
        let page = HtmlPage::parse(DOC);
        let h2 = page.find("section h2").unwrap();
        assert_eq!(h2.text(), "Request Body");
    }

    #[test]
    fn attributes_and_scoped_lookup() {
        let page = HtmlPage::parse(DOC);
        let nav = page.find("nav").unwrap();
        let links = nav.find_all("a[href]");
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].attribute("href").as_deref(), Some("/a"));
        assert_eq!(links[0].attribute("title"), None);
    }

    #[test]
    fn hidden_elements_are_not_visible() {
        let page = HtmlPage::parse(DOC);
        let links = page.find_all("nav a");
        assert!(links[0].is_visible());
        assert!(!links[1].is_visible());
        let ghost = page.find("button").unwrap();
        assert!(!ghost.is_visible());
    }

    #[test]
    fn bad_selector_matches_nothing() {
        let page = HtmlPage::parse(DOC);
        assert!(page.find_all("[[nope").is_empty());
    }

    #[test]
    fn fixture_browser_serves_known_urls_only() {
        let mut pages = HashMap::new();
        pages.insert("https://docs.example/a".to_string(), DOC.to_string());
        let browser = HtmlBrowser::fixtures(pages);
        assert!(browser.open("https://docs.example/a").is_ok());
        assert!(browser.open("https://docs.example/missing").is_err());
    }
}
