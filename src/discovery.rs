use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, info};
use url::Url;

use crate::dom::{Browser, Element, Page};
use crate::parser::category::derive_endpoint_name;
use crate::schema::APIEndpoint;

pub const DISCOVERY_SETTLE: Duration = Duration::from_secs(3);

const LINK_SELECTOR: &str =
    "nav a[href], aside a[href], [class*='Navigation'] a[href], [class*='Sidebar'] a[href]";
const EXPANDABLE_SELECTOR: &str =
    "[class*='NavItem'] button, [class*='Expand'], [class*='Toggle'], [aria-expanded='false']";

const MAX_NAV_PASSES: usize = 3;
const NAV_CLICK_PAUSE: Duration = Duration::from_millis(100);
const NAV_PASS_PAUSE: Duration = Duration::from_millis(300);

static VERSION_SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/v\d+(\.\d+)*(/|$)").unwrap());

/// Slugs of prose pages that live next to endpoint pages.
const DOC_PAGES: &[&str] = &[
    "gettingstarted",
    "filtering",
    "error-handling",
    "errorhandling",
    "authentication",
    "authorization",
    "introduction",
    "overview",
    "changelog",
    "migration",
    "generic-information",
    "quick_start",
    "quickstart",
];

/// Path-shape test for endpoint documentation pages.
pub fn is_endpoint_url(url: &str) -> bool {
    let lower = url.to_lowercase();

    if !VERSION_SEGMENT_RE.is_match(&lower) {
        return false;
    }
    if lower.ends_with("/overview") || lower.ends_with("/index") || lower.ends_with('/') {
        return false;
    }
    // Connector docs are not REST endpoints
    if lower.contains("connector") {
        return false;
    }
    !DOC_PAGES.iter().any(|doc| lower.ends_with(&format!("/{}", doc)))
}

/// Absolute form of a navigation href. `None` for in-page anchors, script links and
/// anything that does not parse.
pub fn resolve_href(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.contains("javascript:") {
        return None;
    }
    base.join(href).ok().map(String::from)
}

/// Load the docs landing page and list every endpoint page linked from its navigation.
pub fn discover_endpoints<B: Browser>(browser: &B, base_url: &str) -> Result<Vec<APIEndpoint>> {
    let base = Url::parse(base_url).with_context(|| format!("Invalid base URL: {}", base_url))?;

    info!(url = base_url, "Discovering endpoints");
    let page = browser
        .open(base_url)
        .with_context(|| format!("Failed to open {}", base_url))?;
    page.wait_for_load()
        .with_context(|| format!("Page never finished loading: {}", base_url))?;
    page.pause(DISCOVERY_SETTLE);

    expand_navigation(&page);
    let endpoints = collect_endpoints(&page, &base);

    info!(count = endpoints.len(), "Discovered API endpoints");
    Ok(endpoints)
}

/// Walk navigation links in document order. Non-endpoint links set the category for the
/// endpoints that follow them.
pub fn collect_endpoints<P: Page>(page: &P, base: &Url) -> Vec<APIEndpoint> {
    let links = page.find_all(LINK_SELECTOR);
    debug!(count = links.len(), "Found navigation links");

    let mut seen = HashSet::new();
    let mut category = String::new();
    let mut endpoints = Vec::new();

    for link in &links {
        let Some(url) = link.attribute("href").and_then(|href| resolve_href(base, &href)) else {
            continue;
        };
        if seen.contains(&url) {
            continue;
        }

        let text = link.text();
        if !is_endpoint_url(&url) {
            if !text.is_empty() && !text.to_lowercase().contains("overview") {
                category = text;
            }
            continue;
        }

        seen.insert(url.clone());
        let name = if text.is_empty() { derive_endpoint_name(&url) } else { text };
        endpoints.push(APIEndpoint {
            name,
            url,
            category: category.clone(),
        });
    }

    endpoints
}

/// Open collapsed navigation groups. Stops after a pass that clicks nothing.
pub fn expand_navigation<P: Page>(page: &P) -> usize {
    let mut total = 0;

    for pass in 0..MAX_NAV_PASSES {
        let mut clicked = 0;
        for el in page.find_all(EXPANDABLE_SELECTOR) {
            if el.is_visible() && el.click().is_ok() {
                clicked += 1;
                page.pause(NAV_CLICK_PAUSE);
            }
        }
        if clicked == 0 {
            break;
        }
        total += clicked;
        page.pause(NAV_PASS_PAUSE);
        debug!(pass = pass + 1, clicked, "Expanded navigation");
    }

    total
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{HtmlBrowser, HtmlPage};
    use std::collections::HashMap;

    const BASE: &str = "https://developer.ui.com/network/v10.0.162/gettingstarted";

    #[test]
    fn endpoint_urls() {
        assert!(is_endpoint_url("https://docs.example/network/v10.0.162/executeconnectedclientaction"));
        assert!(is_endpoint_url("https://developer.ui.com/site-manager/v1/listhosts"));
        assert!(is_endpoint_url("https://developer.ui.com/site-manager/v1"));
    }

    #[test]
    fn non_endpoint_urls() {
        for url in [
            "https://docs.example/network/v10.0.162/overview",
            "https://docs.example/network/v10.0.162/authentication",
            "https://docs.example/network/v10.0.162/Quick_Start",
            "https://docs.example/network/v10.0.162/error-handling",
            "https://docs.example/network/v10.0.162/clients/",
            "https://docs.example/network/v10.0.162/index",
            "https://docs.example/network/v10.0.162/connectors/list",
            "https://docs.example/network/listclients",
            "https://docs.example/network/version1/listclients",
        ] {
            assert!(!is_endpoint_url(url), "{}", url);
        }
    }

    #[test]
    fn hrefs() {
        let base = Url::parse(BASE).unwrap();
        assert_eq!(
            resolve_href(&base, "/network/v10.0.162/listsites").as_deref(),
            Some("https://developer.ui.com/network/v10.0.162/listsites")
        );
        assert_eq!(
            resolve_href(&base, "https://other.example/v1/x").as_deref(),
            Some("https://other.example/v1/x")
        );
        assert_eq!(resolve_href(&base, "#responses"), None);
        assert_eq!(resolve_href(&base, "javascript:void(0)"), None);
        assert_eq!(resolve_href(&base, "  "), None);
    }

    #[test]
    fn navigation_fixture() {
        let html = std::fs::read_to_string("tests/fixtures/navigation.html").unwrap();
        let mut pages = HashMap::new();
        pages.insert(BASE.to_string(), html);
        let endpoints = discover_endpoints(&HtmlBrowser::fixtures(pages), BASE).unwrap();

        let got: Vec<(&str, &str, &str)> = endpoints
            .iter()
            .map(|e| (e.name.as_str(), e.url.as_str(), e.category.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                (
                    "List Sites",
                    "https://developer.ui.com/network/v10.0.162/listsites",
                    "Sites"
                ),
                (
                    "List Connected Clients",
                    "https://developer.ui.com/network/v10.0.162/listconnectedclients",
                    "Clients"
                ),
                (
                    "Executeconnectedclientaction",
                    "https://developer.ui.com/network/v10.0.162/executeconnectedclientaction",
                    "Clients"
                ),
                (
                    "Get Host",
                    "https://developer.ui.com/site-manager/v1.0.0/gethost",
                    "Hosts"
                ),
            ]
        );
    }

    #[test]
    fn overview_links_keep_the_current_category() {
        let page = HtmlPage::parse(
            r#"<nav>
                 <a href="/api/v1/devices/">Devices</a>
                 <a href="/api/v1/overview">API Overview</a>
                 <a href="/api/v1/listdevices">List Devices</a>
               </nav>"#,
        );
        let base = Url::parse("https://docs.example/api/v1/").unwrap();
        let endpoints = collect_endpoints(&page, &base);
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].category, "Devices");
    }

    #[test]
    fn navigation_expansion_is_bounded() {
        let page = HtmlPage::parse(
            r#"<nav><div class="NavItem__Group"><button>Clients</button></div>
                 <span class="Toggle__Icon" hidden></span></nav>"#,
        );
        assert_eq!(expand_navigation(&page), MAX_NAV_PASSES);
        assert_eq!(expand_navigation(&HtmlPage::parse("<nav></nav>")), 0);
    }
}
