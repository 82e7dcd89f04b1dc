use crate::dom::Element;

use super::depth::{row_signature, DepthResolver};

pub const ROW_SELECTOR: &str = "[class*='PropertyRow']";

const NAME_SELECTOR: &str = "[class*='PropertyName']";
const TYPE_SELECTOR: &str = "[class*='PropertyType']";
const REQUIRED_SELECTOR: &str = "[class*='RequiredBadge']";
const DESCRIPTION_SELECTOR: &str = "[class*='PropertyDescription']";
const RADIO_SELECTOR: &str = "label[class*='Radio']";

const PLACEHOLDER_OPTIONS: &[&str] = &["Select...", "Select…", "Choose...", "Choose…"];

/// One property-table row, flat, tagged with its nesting depth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyRowInfo {
    pub name: String,
    pub ty: String,
    pub description: String,
    pub required: bool,
    pub r#enum: Vec<String>,
    pub is_object: bool,
    pub is_array: bool,
    pub depth: usize,
}

/// All named rows of a section, in document order.
pub fn extract_rows<E: Element>(section: &E, depth: &mut dyn DepthResolver) -> Vec<PropertyRowInfo> {
    section
        .find_all(ROW_SELECTOR)
        .iter()
        .filter_map(|row| extract_row(row, depth))
        .collect()
}

/// Read one row. `None` means the row has no name and should be dropped.
pub fn extract_row<E: Element>(row: &E, depth: &mut dyn DepthResolver) -> Option<PropertyRowInfo> {
    let name = row.find(NAME_SELECTOR).map(|el| el.text())?;
    if name.is_empty() {
        return None;
    }

    let ty = extract_type(row);
    let lower = ty.to_lowercase();

    Some(PropertyRowInfo {
        required: row.find(REQUIRED_SELECTOR).is_some(),
        description: row
            .find(DESCRIPTION_SELECTOR)
            .map(|el| el.text())
            .unwrap_or_default(),
        r#enum: extract_enum(row),
        is_array: lower.contains("array"),
        is_object: lower.contains("object"),
        depth: row
            .attribute("class")
            .as_deref()
            .and_then(row_signature)
            .map(|sig| depth.resolve(sig))
            .unwrap_or(0),
        name,
        ty,
    })
}

/// Type label first, then whatever the row's try-it control implies.
fn extract_type<E: Element>(row: &E) -> String {
    if let Some(label) = row.find(TYPE_SELECTOR) {
        let text = label.text();
        if !text.is_empty() {
            return text;
        }
    }

    let has_options = row
        .find("select")
        .is_some_and(|s| !s.find_all("option").is_empty());

    if has_options {
        "string".into()
    } else if row.find("input[type='number']").is_some() {
        "integer".into()
    } else if row.find("input[type='checkbox']").is_some() {
        "boolean".into()
    } else if row.find("input[type='text']").is_some() {
        "string".into()
    } else {
        String::new()
    }
}

/// Union of radio labels, select options and datalist suggestions, first-seen order.
fn extract_enum<E: Element>(row: &E) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    let mut push = |v: String| {
        if !v.is_empty() && !values.contains(&v) {
            values.push(v);
        }
    };

    for radio in row.find_all(RADIO_SELECTOR) {
        let text = radio.text();
        if !text.to_lowercase().contains("discriminator") {
            push(text);
        }
    }

    if let Some(select) = row.find("select") {
        for opt in select.find_all("option") {
            match opt.attribute("value").filter(|v| !v.is_empty()) {
                Some(value) => push(value),
                None => {
                    let text = opt.text();
                    if !PLACEHOLDER_OPTIONS.contains(&text.as_str()) {
                        push(text);
                    }
                }
            }
        }
    }

    if let Some(datalist) = row.find("datalist") {
        for opt in datalist.find_all("option") {
            if let Some(value) = opt.attribute("value") {
                push(value);
            }
        }
    }

    values
}
