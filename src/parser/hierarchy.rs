use crate::schema::Property;

use super::rows::PropertyRowInfo;

/// Fold a section's flat, depth-tagged rows into a property forest.
///
/// An object row owns every following row that is deeper than itself, up to the next
/// row at its own depth or shallower. Sibling order is kept as documented.
pub fn build_hierarchy(rows: &[PropertyRowInfo]) -> Vec<Property> {
    let mut result = Vec::new();
    let mut i = 0;

    while i < rows.len() {
        let (prop, consumed) = build_node(rows, i, 0);
        if let Some(prop) = prop {
            result.push(prop);
        }
        // A row shallower than expected consumes nothing; always advance
        i += consumed.max(1);
    }

    result
}

fn build_node(rows: &[PropertyRowInfo], start: usize, expected_depth: usize) -> (Option<Property>, usize) {
    let Some(info) = rows.get(start) else {
        return (None, 0);
    };
    if info.depth < expected_depth {
        return (None, 0);
    }

    let mut prop = Property {
        name: info.name.clone(),
        ty: info.ty.clone(),
        description: info.description.clone(),
        required: info.required,
        r#enum: info.r#enum.clone(),
        children: Vec::new(),
        is_array: info.is_array,
    };
    let mut consumed = 1;

    if info.is_object {
        let child_depth = info.depth + 1;

        while let Some(next) = rows.get(start + consumed) {
            if next.depth <= info.depth {
                break;
            }
            if next.depth == child_depth {
                let (child, child_consumed) = build_node(rows, start + consumed, child_depth);
                if let Some(child) = child {
                    prop.children.push(child);
                }
                consumed += child_consumed.max(1);
            } else {
                // Deeper than a direct child but not claimed by one: malformed depth
                // sequence. Skip it so indices stay aligned.
                consumed += 1;
            }
        }
    }

    (Some(prop), consumed)
}

/// Depth-first inverse of `build_hierarchy`.
pub fn flatten(props: &[Property]) -> Vec<PropertyRowInfo> {
    let mut rows = Vec::new();
    flatten_into(props, 0, &mut rows);
    rows
}

fn flatten_into(props: &[Property], depth: usize, rows: &mut Vec<PropertyRowInfo>) {
    for prop in props {
        rows.push(PropertyRowInfo {
            name: prop.name.clone(),
            ty: prop.ty.clone(),
            description: prop.description.clone(),
            required: prop.required,
            r#enum: prop.r#enum.clone(),
            is_object: prop.is_object(),
            is_array: prop.is_array,
            depth,
        });
        flatten_into(&prop.children, depth + 1, rows);
    }
}
