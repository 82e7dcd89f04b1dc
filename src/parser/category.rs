use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::schema::{APISchema, Property};

use super::variants::accept_branches;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^v\d+(\.\d+)*$").unwrap());
static NON_ALNUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]+").unwrap());

const ACTION_SEGMENTS: &[&str] = &[
    "actions", "action", "execute", "batch", "bulk", "export", "import", "search", "count", "stats",
];

const NAME_PREFIXES: &[&str] = &["Execute ", "Get ", "List ", "Create ", "Update ", "Delete "];

/// Resource collection a path belongs to: the right-most segment that is not a
/// placeholder, `api`, a version, or an action suffix. Empty if nothing qualifies.
pub fn derive_category(path: &str) -> String {
    path.trim_matches('/')
        .split('/')
        .rev()
        .find(|seg| !seg.is_empty() && !is_path_parameter(seg) && !is_non_resource_segment(seg))
        .map(str::to_lowercase)
        .unwrap_or_default()
}

/// `{siteId}` or `:siteId`.
pub fn is_path_parameter(segment: &str) -> bool {
    (segment.starts_with('{') && segment.ends_with('}')) || (segment.starts_with(':') && segment.len() > 1)
}

pub fn is_non_resource_segment(segment: &str) -> bool {
    let lower = segment.to_lowercase();
    lower == "api" || VERSION_RE.is_match(&lower) || ACTION_SEGMENTS.contains(&lower.as_str())
}

/// Drop request fields that repeat a path parameter, from the flat properties and every
/// variant branch. Branches that end up empty or indistinguishable collapse the union
/// back to the flat shape. A request left with nothing at all becomes `None`.
pub fn strip_path_params(schema: &mut APISchema) {
    if schema.path_params.is_empty() {
        return;
    }
    let Some(request) = schema.request.as_mut() else {
        return;
    };

    let params: HashSet<String> = schema.path_params.iter().map(|p| p.name.to_lowercase()).collect();
    let keep = |p: &Property| !params.contains(&p.name.to_lowercase());

    request.properties.retain(keep);
    for branch in request.variants.values_mut() {
        branch.retain(keep);
    }
    // Stripping can leave fewer than two branches, or branches that no longer differ
    let branches: Vec<_> = std::mem::take(&mut request.variants)
        .into_iter()
        .filter(|(_, branch)| !branch.is_empty())
        .collect();
    match accept_branches(branches) {
        Some(variants) => request.variants = variants,
        None => request.variant_discriminator = None,
    }

    if request.properties.is_empty() && request.variants.is_empty() {
        schema.request = None;
    }
}

/// Fallback endpoint name from the last URL segment, e.g. `.../getsitedetails?x=1`
/// becomes `Getsitedetails`. `"API"` when the URL ends in a slash.
pub fn derive_endpoint_name(url: &str) -> String {
    let last = url.rsplit('/').next().unwrap_or_default();
    let last = last.split('?').next().unwrap_or_default();
    if last.is_empty() {
        return "API".into();
    }
    to_type_name(last)
}

/// PascalCase a display name, dropping verb prefixes like "Get " and a trailing " Action".
pub fn to_type_name(name: &str) -> String {
    let mut name = name;
    for prefix in NAME_PREFIXES {
        if let Some(rest) = name.strip_prefix(prefix) {
            name = rest;
            break;
        }
    }
    let name = name.strip_suffix(" Action").unwrap_or(name);

    NON_ALNUM_RE
        .split(name)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// `"List Connected Clients"` -> `"list_connected_clients"`.
pub fn endpoint_filename(name: &str) -> String {
    NON_ALNUM_RE
        .split(name)
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

// ── Tests ──
