pub mod category;
pub mod depth;
pub mod hierarchy;
pub mod rows;
pub mod sections;
pub mod variants;

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::dom::{Browser, Element, Page};
use crate::schema::APISchema;
use depth::{DepthResolver, FirstSeenDepth};

/// Client-side rendering settle time after a page reports loaded.
pub const PAGE_SETTLE: Duration = Duration::from_secs(2);

const TITLE_SELECTOR: &str = "article h1, main h1, [class*='EndpointTitle'], [class*='PageTitle']";
const METHOD_SELECTOR: &str = "[class*='MethodBadge']";
const PATH_SELECTOR: &str = "[class*='EndpointPath__Path']";
const DESCRIPTION_SELECTOR: &str = "[class*='EndpointDescription']";

/// Open one documentation page and extract its schema.
/// Only the page load can fail; everything after degrades to partial data.
pub fn scrape_url<B: Browser>(browser: &B, url: &str) -> Result<APISchema> {
    info!(url, "Opening page");
    let page = browser
        .open(url)
        .with_context(|| format!("Failed to open {}", url))?;
    page.wait_for_load()
        .with_context(|| format!("Page never finished loading: {}", url))?;
    page.pause(PAGE_SETTLE);

    Ok(scrape_page(&page, url))
}

/// Three passes over a loaded page: header fields → expand nested rows → sections.
pub fn scrape_page<P: Page>(page: &P, url: &str) -> APISchema {
    scrape_page_with(page, url, &mut FirstSeenDepth::new())
}

pub fn scrape_page_with<P: Page>(page: &P, url: &str, depth: &mut dyn DepthResolver) -> APISchema {
    let text_of = |selector: &str| page.find(selector).map(|el| el.text()).unwrap_or_default();

    let mut schema = APISchema {
        endpoint: text_of(TITLE_SELECTOR),
        method: text_of(METHOD_SELECTOR).to_uppercase(),
        path: text_of(PATH_SELECTOR),
        description: text_of(DESCRIPTION_SELECTOR),
        ..Default::default()
    };
    schema.category = category::derive_category(&schema.path);
    if schema.endpoint.is_empty() || schema.endpoint == "Developer" {
        schema.endpoint = category::derive_endpoint_name(url);
    }
    debug!(
        endpoint = %schema.endpoint,
        method = %schema.method,
        path = %schema.path,
        category = %schema.category,
        "Page header"
    );

    let expanded = sections::expand_nested(page);
    debug!(clicks = expanded, "Expanded nested objects");

    sections::classify_sections(page, &mut schema, depth);
    category::strip_path_params(&mut schema);

    info!(
        endpoint = %schema.endpoint,
        path_params = schema.path_params.len(),
        request = schema.request.as_ref().map_or(0, |r| r.properties.len()),
        response = schema.response.as_ref().map_or(0, |r| r.properties.len()),
        "Extracted schema"
    );
    schema
}

// ── Tests ──
