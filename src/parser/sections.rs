use std::time::Duration;

use tracing::debug;

use crate::dom::{Element, Page};
use crate::schema::{APISchema, Property, SchemaObject};

use super::depth::DepthResolver;
use super::hierarchy::build_hierarchy;
use super::rows::{extract_row, extract_rows, ROW_SELECTOR};
use super::variants::discover_variants;

const SECTION_SELECTOR: &str = "section";
const HEADING_SELECTOR: &str = "h2, h3, [class*='SectionTitle']";
const EXPAND_SELECTOR: &str = "[class*='ExpandButton']";

const MAX_EXPAND_PASSES: usize = 5;
const EXPAND_CLICK_PAUSE: Duration = Duration::from_millis(200);
const EXPAND_PASS_PAUSE: Duration = Duration::from_millis(300);

/// Markers that end a text window in a heading-less section.
const WINDOW_END_MARKERS: &[&str] = &[
    "path parameters",
    "request body",
    "responses",
    "query parameters",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    PathParams,
    Request,
    Response,
}

impl SectionKind {
    const ALL: [SectionKind; 3] = [SectionKind::PathParams, SectionKind::Request, SectionKind::Response];

    /// What a heading-less section says where this group starts.
    fn marker(self) -> &'static str {
        match self {
            SectionKind::PathParams => "path parameters",
            SectionKind::Request => "request body",
            SectionKind::Response => "responses",
        }
    }
}

/// Case-insensitive heading match. Path params are checked before request, and request
/// before response.
pub fn classify_heading(heading: &str) -> Option<SectionKind> {
    let h = heading.trim().to_lowercase();
    if h.contains("path parameters") || h.contains("path params") {
        Some(SectionKind::PathParams)
    } else if h.contains("request body") || h.contains("request") {
        Some(SectionKind::Request)
    } else if h.contains("response") {
        Some(SectionKind::Response)
    } else {
        None
    }
}

/// Slice of `text` from `marker` up to the nearest following end marker.
/// `text` must already be lowercase.
pub fn text_window<'t>(text: &'t str, marker: &str) -> Option<&'t str> {
    let start = text.find(marker)?;
    let after = start + marker.len();
    let end = WINDOW_END_MARKERS
        .iter()
        .filter(|m| **m != marker)
        .filter_map(|m| text[after..].find(m).map(|pos| after + pos))
        .min()
        .unwrap_or(text.len());
    Some(&text[start..end])
}

/// Which rows of a section belong to a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// The section has its own heading; every row is in the group.
    Whole,
    /// Heading-less section; only rows named inside the kind's text window.
    Window(SectionKind),
}

/// Walk the page's sections in order and fill path params, request and response.
/// The first non-empty section of each kind wins.
pub fn classify_sections<'p, P: Page>(page: &'p P, schema: &mut APISchema, depth: &mut dyn DepthResolver) {
    let sections = page.find_all(SECTION_SELECTOR);
    debug!(count = sections.len(), "Found sections");

    for (i, section) in sections.iter().enumerate() {
        match section.find(HEADING_SELECTOR) {
            Some(heading) => {
                let text = heading.text();
                let Some(kind) = classify_heading(&text) else {
                    debug!(index = i, heading = %text, "Skipping section");
                    continue;
                };
                if is_filled(schema, kind) {
                    continue;
                }
                let props = extract_scoped(section, Scope::Whole, depth);
                debug!(index = i, ?kind, count = props.len(), "Extracted section");
                fill(page, section, schema, kind, Scope::Whole, props, depth);
            }
            None => {
                for kind in SectionKind::ALL {
                    if is_filled(schema, kind) {
                        continue;
                    }
                    let scope = Scope::Window(kind);
                    let props = extract_scoped(section, scope, depth);
                    debug!(index = i, ?kind, count = props.len(), "Extracted section from text");
                    fill(page, section, schema, kind, scope, props, depth);
                }
            }
        }
    }
}

fn is_filled(schema: &APISchema, kind: SectionKind) -> bool {
    match kind {
        SectionKind::PathParams => !schema.path_params.is_empty(),
        SectionKind::Request => schema.request.is_some(),
        SectionKind::Response => schema.response.is_some(),
    }
}

fn fill<'p, P: Page>(
    page: &'p P,
    section: &P::Element<'p>,
    schema: &mut APISchema,
    kind: SectionKind,
    scope: Scope,
    props: Vec<Property>,
    depth: &mut dyn DepthResolver,
) {
    if props.is_empty() {
        return;
    }
    match kind {
        SectionKind::PathParams => schema.path_params = props,
        SectionKind::Request => {
            let mut request = SchemaObject::new("Request", props);
            // Branches are re-read with the same scope as the flat request
            let extract = || extract_scoped(section, scope, depth);
            if let Some(variants) = discover_variants(page, section, &request.properties, extract) {
                request.variant_discriminator = Some(variants.discriminator);
                request.variants = variants.branches;
            }
            schema.request = Some(request);
        }
        SectionKind::Response => schema.response = Some(SchemaObject::new("Response", props)),
    }
}

/// Read the section's current rows for `scope`, with depth signatures learned afresh.
/// The section text is re-read each time, since the page may have changed under it.
fn extract_scoped<E: Element>(section: &E, scope: Scope, depth: &mut dyn DepthResolver) -> Vec<Property> {
    depth.reset();
    match scope {
        Scope::Whole => build_hierarchy(&extract_rows(section, depth)),
        Scope::Window(kind) => {
            let text = section.text().to_lowercase();
            match text_window(&text, kind.marker()) {
                Some(window) => extract_windowed(section, window, depth),
                None => Vec::new(),
            }
        }
    }
}

/// Rows of a heading-less section whose names occur inside the marker's text window.
fn extract_windowed<E: Element>(section: &E, window: &str, depth: &mut dyn DepthResolver) -> Vec<Property> {
    let rows: Vec<_> = section
        .find_all(ROW_SELECTOR)
        .iter()
        .filter_map(|row| extract_row(row, depth))
        .filter(|info| window.contains(&info.name.to_lowercase()))
        .collect();
    build_hierarchy(&rows)
}

/// Click every visible "Expand" control until a pass clicks nothing. Returns the number
/// of clicks.
pub fn expand_nested<P: Page>(page: &P) -> usize {
    let mut total = 0;

    for pass in 0..MAX_EXPAND_PASSES {
        let mut clicked = 0;
        for button in page.find_all(EXPAND_SELECTOR) {
            if button.text() != "Expand" || !button.is_visible() {
                continue;
            }
            if button.click().is_ok() {
                clicked += 1;
                page.pause(EXPAND_CLICK_PAUSE);
            }
        }

        if clicked == 0 {
            break;
        }
        total += clicked;
        page.pause(EXPAND_PASS_PAUSE);
        debug!(pass = pass + 1, clicked, "Expanded nested objects");
    }

    total
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::scripted::ScriptedPage;
    use crate::dom::HtmlPage;
    use crate::parser::depth::FirstSeenDepth;

    fn names(props: &[Property]) -> Vec<&str> {
        props.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn headings() {
        assert_eq!(classify_heading("Path Parameters"), Some(SectionKind::PathParams));
        assert_eq!(classify_heading("path params"), Some(SectionKind::PathParams));
        assert_eq!(classify_heading("Request Body"), Some(SectionKind::Request));
        assert_eq!(classify_heading("REQUEST"), Some(SectionKind::Request));
        assert_eq!(classify_heading("Responses"), Some(SectionKind::Response));
        assert_eq!(classify_heading("Query Parameters"), None);
        assert_eq!(classify_heading("Try it"), None);
    }

    #[test]
    fn window_stops_at_next_marker() {
        let text = "path parameters siteid clientid request body action limit responses data";
        assert_eq!(text_window(text, "path parameters"), Some("path parameters siteid clientid "));
        assert_eq!(text_window(text, "request body"), Some("request body action limit "));
        assert_eq!(text_window(text, "responses"), Some("responses data"));
        assert_eq!(text_window(text, "query parameters"), None);
    }

    #[test]
    fn headingless_section_is_windowed() {
        let html = std::fs::read_to_string("tests/fixtures/client_action.html").unwrap();
        let page = HtmlPage::parse(&html);
        let mut schema = APISchema::default();
        classify_sections(&page, &mut schema, &mut FirstSeenDepth::new());

        assert_eq!(names(&schema.path_params), vec!["siteId", "clientId"]);
        let request = schema.request.unwrap();
        assert!(names(&request.properties).contains(&"action"));
        assert!(names(&request.properties).contains(&"timeLimitMinutes"));
        // The snapshot cannot switch branches, so no variants survive
        assert!(request.variants.is_empty());
    }

    #[test]
    fn first_request_section_wins() {
        let page = HtmlPage::parse(
            r#"<section><h2>Request Body</h2>
                 <div class="PropertyRow a"><span class="PropertyName">first</span></div></section>
               <section><h2>Request</h2>
                 <div class="PropertyRow a"><span class="PropertyName">second</span></div></section>"#,
        );
        let mut schema = APISchema::default();
        classify_sections(&page, &mut schema, &mut FirstSeenDepth::new());
        assert_eq!(names(&schema.request.unwrap().properties), vec!["first"]);
        assert!(schema.response.is_none());
    }

    #[test]
    fn empty_request_section_leaves_request_unset() {
        let page = HtmlPage::parse(r#"<section><h2>Request Body</h2><p>No body</p></section>"#);
        let mut schema = APISchema::default();
        classify_sections(&page, &mut schema, &mut FirstSeenDepth::new());
        assert!(schema.request.is_none());
    }

    #[test]
    fn depth_signatures_reset_per_section() {
        // Each section's first row is top-level even though the second section reuses
        // the first section's nested signature
        let page = HtmlPage::parse(
            r#"<section><h2>Request Body</h2>
                 <div class="PropertyRow top"><span class="PropertyName">data</span><span class="PropertyType">object</span></div>
                 <div class="PropertyRow nested"><span class="PropertyName">id</span></div></section>
               <section><h2>Responses</h2>
                 <div class="PropertyRow nested"><span class="PropertyName">count</span></div></section>"#,
        );
        let mut schema = APISchema::default();
        classify_sections(&page, &mut schema, &mut FirstSeenDepth::new());
        assert_eq!(names(&schema.request.unwrap().properties[0].children), vec!["id"]);
        assert_eq!(names(&schema.response.unwrap().properties), vec!["count"]);
    }

    fn headingless_action_page(with_limit: bool) -> String {
        let limit = if with_limit {
            r#"<div class="PropertyRow hAsh01"><span class="PropertyName">limit</span><span class="PropertyType">integer</span></div>"#
        } else {
            ""
        };
        format!(
            r#"<section>
                 <p>Path Parameters</p>
                 <div class="PropertyRow hAsh01"><span class="PropertyName">siteId</span><span class="PropertyType">string</span></div>
                 <p>Request Body</p>
                 <button>A</button> <button>B</button>
                 <div class="PropertyRow hAsh01"><span class="PropertyName">action</span>
                   <select><option value="A">A</option><option value="B">B</option></select></div>
                 {}
                 <p>Responses</p>
                 <div class="PropertyRow hAsh01"><span class="PropertyName">authorizedAt</span><span class="PropertyType">string</span></div>
               </section>"#,
            limit
        )
    }

    #[test]
    fn headingless_variants_stay_inside_the_request_window() {
        let (a, b) = (headingless_action_page(true), headingless_action_page(false));
        let page = ScriptedPage::new(&[("A", a.as_str()), ("B", b.as_str())]);
        let mut schema = APISchema::default();
        classify_sections(&page, &mut schema, &mut FirstSeenDepth::new());

        assert_eq!(names(&schema.path_params), vec!["siteId"]);
        assert_eq!(names(&schema.response.unwrap().properties), vec!["authorizedAt"]);

        let request = schema.request.unwrap();
        assert_eq!(names(&request.properties), vec!["action", "limit"]);
        assert_eq!(request.variant_discriminator.as_deref(), Some("action"));
        assert_eq!(names(&request.variants["A"]), vec!["action", "limit"]);
        assert_eq!(names(&request.variants["B"]), vec!["action"]);
    }

    #[test]
    fn expand_is_bounded_on_static_pages() {
        let page = HtmlPage::parse(
            r#"<button class="ExpandButton__Btn">Expand</button>
               <button class="ExpandButton__Btn">Collapse</button>
               <button class="ExpandButton__Btn" hidden>Expand</button>"#,
        );
        // A snapshot never changes, so the one visible button is clicked every pass
        assert_eq!(expand_nested(&page), MAX_EXPAND_PASSES);
    }
}
