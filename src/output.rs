use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::parser::category::{derive_category, endpoint_filename};
use crate::schema::{APISchema, GenerateResult};

pub const SCHEMA_FILE: &str = "types_schema.json";
const FALLBACK_CATEGORY: &str = "common";

/// Where a schema is filed: its own category, else one derived from its path, else
/// `common`.
pub fn output_category(schema: &APISchema) -> String {
    let own = schema.category.trim();
    if !own.is_empty() {
        return own.to_string();
    }
    match derive_category(&schema.path) {
        c if c.is_empty() => FALLBACK_CATEGORY.to_string(),
        c => c,
    }
}

/// Successful schemas grouped by category, each group sorted by endpoint name.
pub fn group_by_category(results: &[GenerateResult]) -> BTreeMap<String, Vec<APISchema>> {
    let mut groups: BTreeMap<String, Vec<APISchema>> = BTreeMap::new();
    for schema in results.iter().filter(|r| r.is_ok()).filter_map(|r| r.schema.as_ref()) {
        let category = output_category(schema);
        let mut schema = schema.clone();
        schema.category = category.clone();
        groups.entry(category).or_default().push(schema);
    }
    for schemas in groups.values_mut() {
        schemas.sort_by(|a, b| a.endpoint.cmp(&b.endpoint));
    }
    groups
}

/// Write `<dir>/<category>/types_schema.json` for every category. Returns the written
/// paths in category order.
pub fn write_schemas(dir: &Path, results: &[GenerateResult]) -> Result<Vec<PathBuf>> {
    let groups = group_by_category(results);

    let written = groups
        .par_iter()
        .map(|(category, schemas)| {
            let category_dir = dir.join(category);
            fs::create_dir_all(&category_dir)
                .with_context(|| format!("Failed to create {}", category_dir.display()))?;

            let mut json = serde_json::to_string_pretty(schemas)
                .with_context(|| format!("Failed to serialize schemas for {}", category))?;
            json.push('\n');

            let path = category_dir.join(SCHEMA_FILE);
            fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), schemas = schemas.len(), "Written");
            Ok(path)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(written)
}

/// Write each successful result's rendered code to `<dir>/<category>/<endpoint>.rs`.
///
/// Endpoint names that reduce to the same file name in one category get `_2`, `_3`, ...
/// suffixes, assigned in (name, url) order so reruns produce the same files.
pub fn write_code(dir: &Path, results: &[GenerateResult]) -> Result<Vec<PathBuf>> {
    let planned = plan_code_files(dir, results);

    planned
        .par_iter()
        .map(|(path, code)| {
            if let Some(category_dir) = path.parent() {
                fs::create_dir_all(category_dir)
                    .with_context(|| format!("Failed to create {}", category_dir.display()))?;
            }
            fs::write(path, code).with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(path.clone())
        })
        .collect()
}

fn plan_code_files<'r>(dir: &Path, results: &'r [GenerateResult]) -> Vec<(PathBuf, &'r str)> {
    let mut entries: Vec<_> = results
        .iter()
        .filter(|r| r.is_ok())
        .filter_map(|r| Some((output_category(r.schema.as_ref()?), r, r.code.as_deref()?)))
        .collect();
    entries.sort_by(|(ca, a, _), (cb, b, _)| {
        (ca, &a.endpoint.name, &a.endpoint.url).cmp(&(cb, &b.endpoint.name, &b.endpoint.url))
    });

    let mut taken: HashSet<PathBuf> = HashSet::new();
    let mut planned = Vec::with_capacity(entries.len());
    for (category, result, code) in entries {
        let category_dir = dir.join(&category);
        let stem = endpoint_filename(&result.endpoint.name);
        let mut path = category_dir.join(format!("{}.rs", stem));
        let mut n = 1;
        while taken.contains(&path) {
            n += 1;
            path = category_dir.join(format!("{}_{}.rs", stem, n));
        }
        if n > 1 {
            warn!(
                endpoint = %result.endpoint.name,
                url = %result.endpoint.url,
                path = %path.display(),
                "File name already taken, writing with a suffix"
            );
        }
        taken.insert(path.clone());
        planned.push((path, code));
    }
    planned
}

/// Successful endpoints per category, for the end-of-run summary.
pub fn category_counts(results: &[GenerateResult]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for r in results.iter().filter(|r| r.is_ok() && !r.endpoint.category.is_empty()) {
        *counts.entry(r.endpoint.category.clone()).or_insert(0) += 1;
    }
    counts
}

// ── Tests ──
