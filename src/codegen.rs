//! Rust type definitions rendered from an extracted `APISchema`.
//!
//! One schema becomes up to three top-level items (`<Name>PathParams`, `<Name>Request`,
//! `<Name>Response`) plus a struct per nested object and an enum per enum-valued field.
//! A request with variants renders as an internally tagged enum keyed by its
//! discriminator.

use std::collections::HashSet;
use std::fmt::Write;

use crate::parser::category::to_type_name;
use crate::schema::{APISchema, Property, SchemaObject};

const DERIVES: &str = "#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]";

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "box", "break", "const", "continue", "dyn", "else", "enum", "extern", "false",
    "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "static", "struct", "trait", "true", "try", "type", "unsafe", "use", "where", "while", "yield",
];

/// Prefix shared by an endpoint's top-level type names.
pub fn type_base(endpoint: &str) -> String {
    match to_type_name(endpoint) {
        name if name.is_empty() => "Api".to_string(),
        name if name.starts_with(|c: char| c.is_ascii_digit()) => format!("Api{}", name),
        name => name,
    }
}

/// Render every type for one endpoint page as a standalone Rust module.
pub fn render(schema: &APISchema, module: &str) -> String {
    let base = type_base(&schema.endpoint);

    let mut r = Renderer::default();
    if !schema.path_params.is_empty() {
        r.render_struct(&format!("{}PathParams", base), "Path parameters.", &schema.path_params);
    }
    if let Some(request) = &schema.request {
        r.render_object(&format!("{}Request", base), &schema.description, request);
    }
    if let Some(response) = &schema.response {
        r.render_object(&format!("{}Response", base), "", response);
    }

    let mut out = String::new();
    let _ = writeln!(out, "//! `{}` types for \"{}\".", module, schema.endpoint);
    if !schema.method.is_empty() || !schema.path.is_empty() {
        let _ = writeln!(out, "//!");
        let _ = writeln!(out, "//! `{} {}`", schema.method, schema.path);
    }
    out.push_str("//!\n//! Generated from the API documentation. Do not edit.\n\n");
    out.push_str("use serde::{Deserialize, Serialize};\n");
    for item in r.items {
        out.push('\n');
        out.push_str(&item);
    }
    out
}

#[derive(Default)]
struct Renderer {
    items: Vec<String>,
    names: HashSet<String>,
}

impl Renderer {
    /// Reserve a type name, suffixing a counter on collision.
    fn claim(&mut self, wanted: &str) -> String {
        let mut name = wanted.to_string();
        let mut n = 2;
        while !self.names.insert(name.clone()) {
            name = format!("{}{}", wanted, n);
            n += 1;
        }
        name
    }

    /// Reserve an output slot so parents print before the children they create.
    fn slot(&mut self) -> usize {
        self.items.push(String::new());
        self.items.len() - 1
    }

    fn render_object(&mut self, name: &str, doc: &str, obj: &SchemaObject) -> String {
        match &obj.variant_discriminator {
            Some(tag) if obj.has_variants() => self.render_tagged(name, doc, tag, obj),
            _ => self.render_struct(name, doc, &obj.properties),
        }
    }

    fn render_struct(&mut self, wanted: &str, doc: &str, props: &[Property]) -> String {
        let name = self.claim(wanted);
        let slot = self.slot();

        let mut body = String::new();
        push_doc(&mut body, doc, "");
        let _ = writeln!(body, "{}", DERIVES);
        let _ = writeln!(body, "pub struct {} {{", name);
        for prop in props {
            let field = self.render_field(&name, prop, "pub ");
            body.push_str(&field);
        }
        body.push_str("}\n");

        self.items[slot] = body;
        name
    }

    fn render_tagged(&mut self, wanted: &str, doc: &str, tag: &str, obj: &SchemaObject) -> String {
        let name = self.claim(wanted);
        let slot = self.slot();

        let mut body = String::new();
        push_doc(&mut body, doc, "");
        let _ = writeln!(body, "{}", DERIVES);
        let _ = writeln!(body, "#[serde(tag = \"{}\")]", tag);
        let _ = writeln!(body, "pub enum {} {{", name);
        for (literal, props) in &obj.variants {
            let variant = variant_ident(literal);
            let _ = writeln!(body, "    #[serde(rename = \"{}\")]", literal);
            let fields: Vec<&Property> = props.iter().filter(|p| p.name != tag).collect();
            if fields.is_empty() {
                let _ = writeln!(body, "    {},", variant);
                continue;
            }
            let _ = writeln!(body, "    {} {{", variant);
            let owner = format!("{}{}", name, variant);
            for prop in fields {
                let field = self.render_field(&owner, prop, "");
                for line in field.lines() {
                    let _ = writeln!(body, "    {}", line);
                }
            }
            body.push_str("    },\n");
        }
        body.push_str("}\n");

        self.items[slot] = body;
        name
    }

    fn render_enum(&mut self, wanted: &str, literals: &[String]) -> String {
        let name = self.claim(wanted);
        let mut body = String::new();
        let _ = writeln!(body, "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]");
        let _ = writeln!(body, "pub enum {} {{", name);
        let mut used = HashSet::new();
        for literal in literals {
            let variant = variant_ident(literal);
            if !used.insert(variant.clone()) {
                continue;
            }
            let _ = writeln!(body, "    #[serde(rename = \"{}\")]", literal);
            let _ = writeln!(body, "    {},", variant);
        }
        body.push_str("}\n");
        self.items.push(body);
        name
    }

    fn render_field(&mut self, owner: &str, prop: &Property, vis: &str) -> String {
        let ident = field_ident(&prop.name);
        let inner = self.field_type(owner, prop);
        let ty = if prop.required { inner } else { format!("Option<{}>", inner) };

        let mut attrs = Vec::new();
        if ident.trim_start_matches("r#") != prop.name {
            attrs.push(format!("rename = \"{}\"", prop.name));
        }
        if !prop.required {
            attrs.push("default".to_string());
            attrs.push("skip_serializing_if = \"Option::is_none\"".to_string());
        }

        let mut out = String::new();
        if prop.description.is_empty() && is_timestamp_name(&prop.name) {
            push_doc(&mut out, "RFC 3339 timestamp.", "    ");
        } else {
            push_doc(&mut out, &prop.description, "    ");
        }
        if !attrs.is_empty() {
            let _ = writeln!(out, "    #[serde({})]", attrs.join(", "));
        }
        let _ = writeln!(out, "    {}{}: {},", vis, ident, ty);
        out
    }

    fn field_type(&mut self, owner: &str, prop: &Property) -> String {
        let nested = format!("{}{}", owner, pascal(&prop.name));

        let element = if !prop.children.is_empty() {
            self.render_struct(&nested, "", &prop.children)
        } else if !prop.r#enum.is_empty() && !prop.is_object() {
            self.render_enum(&nested, &prop.r#enum)
        } else {
            scalar_type(&prop.ty, &prop.name)
        };

        if prop.is_array {
            format!("Vec<{}>", element)
        } else {
            element
        }
    }
}

/// Base Rust type for a documented type string, refined by field-name conventions.
pub fn scalar_type(ty: &str, field: &str) -> String {
    let lower_name = field.to_lowercase();
    if lower_name.ends_with("pct")
        || lower_name.ends_with("percent")
        || lower_name.ends_with("ratio")
        || lower_name.contains("loadaverage")
        || (lower_name.contains("frequency") && lower_name.contains("ghz"))
    {
        return "f64".into();
    }

    let t = ty.trim().to_lowercase();
    let element = t.strip_prefix("array of ").unwrap_or(&t);
    let element = element.strip_suffix("[]").unwrap_or(element);
    match element {
        _ if element.contains("object") => "serde_json::Value".into(),
        "string" => "String".into(),
        "integer" | "int" | "int32" | "int64" | "number" => "i64".into(),
        "float" | "float64" | "double" => "f64".into(),
        "boolean" | "bool" => "bool".into(),
        _ => "serde_json::Value".into(),
    }
}

/// `createdAt`, `last_seen_at`.
pub fn is_timestamp_name(field: &str) -> bool {
    if field.to_lowercase().ends_with("_at") {
        return true;
    }
    let chars: Vec<char> = field.chars().collect();
    matches!(chars.as_slice(), [.., before, 'A', 't'] if before.is_lowercase() || before.is_ascii_digit())
}

fn push_doc(out: &mut String, doc: &str, indent: &str) {
    for line in doc.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let _ = writeln!(out, "{}/// {}", indent, line);
    }
}

/// `siteId` -> `site_id`, `type` -> `r#type`, `5` -> `n5`.
pub fn field_ident(name: &str) -> String {
    let snake = snake_case(name);
    let snake = if snake.is_empty() {
        "field".to_string()
    } else if snake.starts_with(|c: char| c.is_ascii_digit()) {
        format!("n{}", snake)
    } else {
        snake
    };
    match snake.as_str() {
        "self" | "super" | "crate" => format!("{}_", snake),
        s if KEYWORDS.contains(&s) => format!("r#{}", s),
        _ => snake,
    }
}

pub(crate) fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower);
            if boundary && !out.ends_with('_') && !out.is_empty() {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out.trim_matches('_').to_string()
}

fn pascal(name: &str) -> String {
    snake_case(name)
        .split('_')
        .filter(|p| !p.is_empty())
        .map(|p| {
            let mut chars = p.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// `AUTHORIZE_GUEST_ACCESS` -> `AuthorizeGuestAccess`, `5m` -> `V5m`.
pub fn variant_ident(literal: &str) -> String {
    let name = pascal(literal);
    if name.is_empty() {
        "Empty".into()
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("V{}", name)
    } else {
        name
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(name: &str, ty: &str, required: bool) -> Property {
        Property {
            name: name.into(),
            ty: ty.into(),
            required,
            ..Default::default()
        }
    }

    #[test]
    fn identifiers() {
        assert_eq!(field_ident("siteId"), "site_id");
        assert_eq!(field_ident("ISPName"), "isp_name");
        assert_eq!(field_ident("download_kbps"), "download_kbps");
        assert_eq!(field_ident("type"), "r#type");
        assert_eq!(field_ident("self"), "self_");
        assert_eq!(field_ident("5"), "n5");
        assert_eq!(field_ident("2.4"), "n2_4");
        assert_eq!(field_ident("loadAverage1Min"), "load_average1_min");
        assert_eq!(variant_ident("AUTHORIZE_GUEST_ACCESS"), "AuthorizeGuestAccess");
        assert_eq!(variant_ident("5m"), "V5m");
        assert_eq!(variant_ident("power-cycle"), "PowerCycle");
    }

    #[test]
    fn scalar_types_and_name_hints() {
        assert_eq!(scalar_type("string", "name"), "String");
        assert_eq!(scalar_type("integer", "count"), "i64");
        assert_eq!(scalar_type("Boolean", "enabled"), "bool");
        assert_eq!(scalar_type("integer", "cpuUtilizationPct"), "f64");
        assert_eq!(scalar_type("number", "loadAverage1Min"), "f64");
        assert_eq!(scalar_type("number", "frequencyGHz"), "f64");
        assert_eq!(scalar_type("array of string", "tags"), "String");
        assert_eq!(scalar_type("object", "meta"), "serde_json::Value");
        assert_eq!(scalar_type("", "mystery"), "serde_json::Value");
        assert!(is_timestamp_name("lastSeenAt"));
        assert!(is_timestamp_name("created_at"));
        assert!(!is_timestamp_name("format"));
        assert!(!is_timestamp_name("stat"));
    }

    #[test]
    fn renders_structs_with_renames_and_options() {
        let mut data = prop("data", "array of object", true);
        data.is_array = true;
        data.children = vec![prop("id", "string", true), prop("lastSeenAt", "string", false)];

        let schema = APISchema {
            endpoint: "List Connected Clients".into(),
            method: "GET".into(),
            path: "/v1/sites/{siteId}/clients".into(),
            path_params: vec![prop("siteId", "string", true)],
            response: Some(SchemaObject::new("Response", vec![data, prop("count", "integer", false)])),
            ..Default::default()
        };
        let code = render(&schema, "clients");

        assert!(code.contains("//! `GET /v1/sites/{siteId}/clients`"));
        assert!(code.contains("pub struct ConnectedClientsPathParams {"));
        assert!(code.contains("#[serde(rename = \"siteId\")]\n    pub site_id: String,"));
        assert!(code.contains("pub struct ConnectedClientsResponse {"));
        assert!(code.contains("pub data: Vec<ConnectedClientsResponseData>,"));
        assert!(code.contains("pub count: Option<i64>,"));
        assert!(code.contains("pub struct ConnectedClientsResponseData {"));
        assert!(code.contains("    /// RFC 3339 timestamp.\n"));
        assert!(code.contains("pub last_seen_at: Option<String>,"));
        assert!(!code.contains("Request"));

        // Parent before child
        let parent = code.find("pub struct ConnectedClientsResponse {").unwrap();
        let child = code.find("pub struct ConnectedClientsResponseData {").unwrap();
        assert!(parent < child);
    }

    #[test]
    fn renders_enums_and_tagged_variants() {
        let mut action = prop("action", "string", true);
        action.r#enum = vec!["AUTHORIZE_GUEST_ACCESS".into(), "UNAUTHORIZE_GUEST_ACCESS".into()];

        let mut request = SchemaObject::new("Request", vec![action.clone()]);
        request.variant_discriminator = Some("action".into());
        request.variants.insert(
            "AUTHORIZE_GUEST_ACCESS".into(),
            vec![action.clone(), prop("timeLimitMinutes", "integer", false)],
        );
        request.variants.insert("UNAUTHORIZE_GUEST_ACCESS".into(), vec![action]);

        let schema = APISchema {
            endpoint: "Execute Client Action".into(),
            request: Some(request),
            ..Default::default()
        };
        let code = render(&schema, "clients");

        assert!(code.contains("#[serde(tag = \"action\")]\npub enum ClientRequest {"));
        assert!(code.contains("    #[serde(rename = \"AUTHORIZE_GUEST_ACCESS\")]\n    AuthorizeGuestAccess {"));
        assert!(code.contains("        time_limit_minutes: Option<i64>,"));
        assert!(code.contains("    UnauthorizeGuestAccess,\n"));
        // The tag is carried by the variant, never as a field
        assert!(!code.contains("action:"));
    }

    #[test]
    fn flat_enum_fields_get_their_own_type() {
        let mut status = prop("status", "string", true);
        status.r#enum = vec!["ONLINE".into(), "OFFLINE".into(), "online".into()];
        let schema = APISchema {
            endpoint: "Get Device".into(),
            response: Some(SchemaObject::new("Response", vec![status])),
            ..Default::default()
        };
        let code = render(&schema, "devices");
        assert!(code.contains("pub status: DeviceResponseStatus,"));
        assert!(code.contains("pub enum DeviceResponseStatus {"));
        assert_eq!(code.matches("    Online,").count(), 1);
    }

    #[test]
    fn colliding_names_are_suffixed() {
        let mut r = Renderer::default();
        assert_eq!(r.claim("Foo"), "Foo");
        assert_eq!(r.claim("Foo"), "Foo2");
        assert_eq!(r.claim("Foo"), "Foo3");
    }
}
