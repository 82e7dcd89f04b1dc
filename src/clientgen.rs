//! API client methods generated from `*_schema.json` files.
//!
//! Every category directory gets a `client.rs` holding one `<Category>Client` struct with
//! one async method per endpoint, calling [`ApiClient`](crate::client::ApiClient). A
//! `mod.rs` next to it declares the client and every per-endpoint type module, and
//! re-exports the types so the methods can name them.

use std::collections::{BTreeMap, HashSet};
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use serde::Deserialize;
use tracing::{info, warn};

use crate::codegen::{field_ident, snake_case, type_base, variant_ident};
use crate::parser::category::is_path_parameter;
use crate::schema::APISchema;

const SCHEMA_SUFFIX: &str = "_schema.json";
const FALLBACK_CATEGORY: &str = "common";

const VERB_PREFIXES: &[&str] = &["List", "Get", "Create", "Update", "Delete", "Execute"];
const LIST_SUFFIXES: &[&str] = &[
    "clients", "sites", "vouchers", "devices", "networks", "users", "guests", "events", "alerts", "logs",
];

/// A schema file holds either one schema or an array of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum SchemaFile {
    Many(Vec<APISchema>),
    One(Box<APISchema>),
}

/// Read every `*_schema.json` under `dir`, grouped by module name. A schema's category
/// comes from the schema itself, then from the directory holding the file, then
/// `common`.
pub fn read_schemas(dir: &Path) -> Result<BTreeMap<String, Vec<APISchema>>> {
    let mut files = Vec::new();
    collect_schema_files(dir, &mut files)?;
    files.sort();

    let mut groups: BTreeMap<String, Vec<APISchema>> = BTreeMap::new();
    for file in &files {
        let raw = fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
        let parsed: SchemaFile =
            serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", file.display()))?;
        let schemas = match parsed {
            SchemaFile::Many(schemas) => schemas,
            SchemaFile::One(schema) => vec![*schema],
        };

        let dir_category = file
            .parent()
            .filter(|parent| *parent != dir)
            .and_then(|parent| parent.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        for schema in schemas {
            let category = if schema.category.trim().is_empty() {
                dir_category.as_str()
            } else {
                schema.category.as_str()
            };
            groups.entry(module_name(category)).or_default().push(schema);
        }
    }

    if groups.is_empty() {
        bail!("no schemas found in {}", dir.display());
    }
    for schemas in groups.values_mut() {
        schemas.sort_by(|a, b| a.endpoint.cmp(&b.endpoint));
    }
    Ok(groups)
}

fn collect_schema_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).with_context(|| format!("Failed to read directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            collect_schema_files(&path, out)?;
        } else if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(SCHEMA_SUFFIX))
        {
            out.push(path);
        }
    }
    Ok(())
}

/// `"Client Devices"` -> `client_devices`, `"5g"` -> `pkg_5g`, blank -> `common`.
pub fn module_name(category: &str) -> String {
    let name: String = category
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let name = name
        .split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    if name.is_empty() {
        FALLBACK_CATEGORY.to_string()
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("pkg_{}", name)
    } else {
        name
    }
}

/// Method name from the endpoint's display name and HTTP method. A leading verb in the
/// name is replaced by one chosen from the method: `GET` lists when the name says so or
/// ends in a known collection, `POST` creates unless the name says execute or action.
pub fn method_name(endpoint: &str, http_method: &str) -> String {
    let sanitized: String = endpoint
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect();
    let rest = VERB_PREFIXES
        .iter()
        .find_map(|prefix| sanitized.strip_prefix(prefix))
        .unwrap_or(&sanitized);

    let lower = endpoint.to_lowercase();
    let verb = match http_method.trim().to_uppercase().as_str() {
        "GET" if lower.contains("list") || is_list_endpoint(&lower) => "list",
        "GET" => "get",
        "POST" if lower.contains("create") => "create",
        "POST" if lower.contains("execute") || lower.contains("action") => "execute",
        "POST" => "create",
        "PUT" => "update",
        "DELETE" => "delete",
        _ => "",
    };

    let rest = snake_case(rest);
    match (verb, rest.is_empty()) {
        ("", true) => "call".to_string(),
        ("", false) => field_ident(&rest),
        (verb, true) => verb.to_string(),
        (verb, false) => format!("{}_{}", verb, rest),
    }
}

fn is_list_endpoint(lower: &str) -> bool {
    LIST_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
}

/// `/v1/sites/{siteId}/clients/{clientId}` -> (`/v1/sites/{}/clients/{}`,
/// `[site_id, client_id]`). `:siteId` segments are treated the same way.
pub fn format_path(path: &str) -> (String, Vec<String>) {
    let mut args = Vec::new();
    let template = path
        .split('/')
        .map(|segment| {
            if !is_path_parameter(segment) {
                return segment.replace('{', "{{").replace('}', "}}");
            }
            let name = segment.trim_start_matches(':').trim_start_matches('{').trim_end_matches('}');
            args.push(field_ident(name));
            "{}".to_string()
        })
        .collect::<Vec<_>>()
        .join("/");
    (template, args)
}

/// Render `client.rs` for one category.
pub fn render_client(category: &str, schemas: &[APISchema]) -> Result<String> {
    if schemas.is_empty() {
        bail!("no schemas provided for {}", category);
    }

    let struct_name = format!("{}Client", variant_ident(category));
    let mut out = String::new();
    let _ = writeln!(out, "//! `{}` API methods.", category);
    out.push_str("//!\n//! Generated from the API documentation. Do not edit.\n\n");
    out.push_str("use unifi_sdk::client::{ApiClient, Result};\n\n");
    out.push_str("#[allow(unused_imports)]\nuse super::*;\n\n");
    let _ = writeln!(out, "#[derive(Debug, Clone)]\npub struct {} {{\n    client: ApiClient,\n}}\n", struct_name);
    let _ = writeln!(out, "impl {} {{", struct_name);
    out.push_str("    pub fn new(client: ApiClient) -> Self {\n        Self { client }\n    }\n");

    let mut names = HashSet::new();
    for schema in schemas {
        let http_method = schema.method.trim().to_uppercase();
        if !matches!(http_method.as_str(), "GET" | "POST" | "PUT" | "DELETE") || schema.path.trim().is_empty() {
            warn!(endpoint = %schema.endpoint, method = %schema.method, "No client call for endpoint, skipped");
            continue;
        }

        let wanted = method_name(&schema.endpoint, &http_method);
        let mut name = wanted.clone();
        let mut n = 2;
        while !names.insert(name.clone()) {
            name = format!("{}_{}", wanted, n);
            n += 1;
        }

        out.push('\n');
        render_method(&mut out, &name, &http_method, schema);
    }
    out.push_str("}\n");
    Ok(out)
}

fn render_method(out: &mut String, name: &str, http_method: &str, schema: &APISchema) {
    let base = type_base(&schema.endpoint);
    let (template, args) = format_path(schema.path.trim());
    let has_body = matches!(http_method, "POST" | "PUT");
    let request = schema.request.as_ref().map(|_| format!("{}Request", base));
    let response = match &schema.response {
        Some(_) => format!("{}Response", base),
        None => "serde_json::Value".to_string(),
    };

    let _ = writeln!(out, "    /// {}", schema.endpoint);
    out.push_str("    ///\n");
    let _ = writeln!(out, "    /// `{} {}`", http_method, schema.path.trim());

    let mut params = vec!["&self".to_string()];
    params.extend(args.iter().map(|arg| format!("{}: &str", arg)));
    if let (true, Some(request)) = (has_body, &request) {
        params.push(format!("body: &{}", request));
    }
    let _ = writeln!(
        out,
        "    pub async fn {}({}) -> Result<{}> {{",
        name,
        params.join(", "),
        response
    );

    let path = if args.is_empty() {
        format!("\"{}\"", template)
    } else {
        format!("&format!(\"{}\", {})", template, args.join(", "))
    };
    let body = if request.is_some() { "body" } else { "&serde_json::json!({})" };
    let call = match http_method {
        "GET" => format!("self.client.get({})", path),
        "DELETE" => format!("self.client.delete({})", path),
        "POST" => format!("self.client.post({}, {})", path, body),
        _ => format!("self.client.put({}, {})", path, body),
    };
    let _ = writeln!(out, "        {}.await", call);
    out.push_str("    }\n");
}

/// `mod.rs` for one category directory: the client plus every other `.rs` file found.
pub fn render_mod(category: &str, type_modules: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "//! `{}` types and client.", category);
    out.push_str("//!\n//! Generated from the API documentation. Do not edit.\n\n");
    out.push_str("pub mod client;\n");
    for module in type_modules {
        let _ = writeln!(out, "pub mod {};", module);
    }
    out.push('\n');
    out.push_str("pub use client::*;\n");
    for module in type_modules {
        let _ = writeln!(out, "pub use {}::*;", module);
    }
    out
}

/// Read schemas from `schema_dir` and write `<output_dir>/<category>/client.rs` and
/// `mod.rs` for each category. Returns the written client paths in category order.
pub fn generate_clients(schema_dir: &Path, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let groups = read_schemas(schema_dir)?;
    info!(categories = groups.len(), "Generating clients");

    groups
        .par_iter()
        .map(|(category, schemas)| {
            let category_dir = output_dir.join(category);
            fs::create_dir_all(&category_dir)
                .with_context(|| format!("Failed to create {}", category_dir.display()))?;

            let code = render_client(category, schemas)?;
            let path = category_dir.join("client.rs");
            fs::write(&path, code).with_context(|| format!("Failed to write {}", path.display()))?;

            let modules = type_modules(&category_dir)?;
            let mod_path = category_dir.join("mod.rs");
            fs::write(&mod_path, render_mod(category, &modules))
                .with_context(|| format!("Failed to write {}", mod_path.display()))?;

            info!(path = %path.display(), methods = schemas.len(), "Written");
            Ok(path)
        })
        .collect()
}

/// Stems of the per-endpoint type files already in a category directory.
fn type_modules(category_dir: &Path) -> Result<Vec<String>> {
    let mut modules = Vec::new();
    for entry in fs::read_dir(category_dir).with_context(|| format!("Failed to read {}", category_dir.display()))? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("rs") {
            continue;
        }
        match path.file_stem().and_then(|s| s.to_str()) {
            Some("mod" | "client") | None => {}
            Some(stem) => modules.push(stem.to_string()),
        }
    }
    modules.sort();
    Ok(modules)
}

// ── Tests ──
