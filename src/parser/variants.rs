//! Discriminated unions in request bodies.
//!
//! A body whose shape depends on an enum field (e.g. `action`) renders one branch at a
//! time; the docs UI has a toggle per literal. We click each toggle, re-extract the rows,
//! and keep the branches only if they actually differ. Clicking and reading are passed
//! in as closures so that the sequencing and the comparison stay pure.

use std::time::Duration;

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::dom::{Element, Page};
use crate::schema::Property;

use super::sections::expand_nested;

const BRANCH_SETTLE: Duration = Duration::from_millis(500);

/// Interactive controls that may switch branches, highest priority first.
const CONTROL_SELECTORS: &[&str] = &[
    "button",
    "[role='tab']",
    "[role='radio'], input[type='radio']",
    "label",
    "[class*='Toggle'], [class*='Segment']",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Variants {
    pub discriminator: String,
    pub branches: IndexMap<String, Vec<Property>>,
}

/// First scalar property with at least two enum literals.
pub fn pick_discriminator(props: &[Property]) -> Option<&Property> {
    props
        .iter()
        .find(|p| p.r#enum.len() >= 2 && !p.is_array && !p.is_object())
}

/// Structural equality: everything but descriptions, children compared recursively.
pub fn same_shape(a: &[Property], b: &[Property]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(x, y)| {
            x.name == y.name
                && x.ty == y.ty
                && x.required == y.required
                && x.is_array == y.is_array
                && x.is_object() == y.is_object()
                && x.r#enum == y.r#enum
                && same_shape(&x.children, &y.children)
        })
}

enum Branch {
    Idle,
    Selected(String),
    Extracted { literal: String, tree: Vec<Property> },
}

/// Walk every literal through Idle -> Selected -> Extracted. Literals with no control
/// to select them, or whose tree comes back empty, produce no branch.
pub fn collect_branches<S, X>(
    literals: &[String],
    mut select: S,
    mut extract: X,
) -> Vec<(String, Vec<Property>)>
where
    S: FnMut(&str) -> bool,
    X: FnMut() -> Vec<Property>,
{
    let mut branches = Vec::new();

    for literal in literals {
        let mut state = Branch::Idle;
        loop {
            state = match state {
                Branch::Idle => {
                    if !select(literal) {
                        debug!(literal = %literal, "No control selects branch");
                        break;
                    }
                    Branch::Selected(literal.clone())
                }
                Branch::Selected(literal) => Branch::Extracted {
                    tree: extract(),
                    literal,
                },
                Branch::Extracted { literal, tree } => {
                    if !tree.is_empty() {
                        branches.push((literal, tree));
                    }
                    break;
                }
            };
        }
    }

    branches
}

/// Keep the branches only when there are at least two and they are not all identical.
/// Identical branches mean the toggle did nothing (or the shape never varies).
pub fn accept_branches(branches: Vec<(String, Vec<Property>)>) -> Option<IndexMap<String, Vec<Property>>> {
    if branches.len() < 2 {
        return None;
    }
    let first = &branches[0].1;
    if branches.iter().all(|(_, tree)| same_shape(tree, first)) {
        return None;
    }
    Some(branches.into_iter().collect())
}

/// Drive the docs UI through every branch of the section's discriminator. `extract`
/// re-reads the section's properties after each selection, scoped the same way as the
/// flat read that produced `props`.
pub fn discover_variants<'p, P, X>(
    page: &'p P,
    section: &P::Element<'p>,
    props: &[Property],
    extract: X,
) -> Option<Variants>
where
    P: Page,
    X: FnMut() -> Vec<Property>,
{
    let discriminator = pick_discriminator(props)?;
    debug!(
        field = %discriminator.name,
        literals = discriminator.r#enum.len(),
        "Trying discriminator"
    );

    let branches = collect_branches(
        &discriminator.r#enum,
        |literal| select_branch(page, section, literal),
        extract,
    );

    let count = branches.len();
    let Some(branches) = accept_branches(branches) else {
        debug!(field = %discriminator.name, branches = count, "Branches not distinct, keeping flat shape");
        return None;
    };

    info!(field = %discriminator.name, branches = branches.len(), "Found request variants");
    Some(Variants {
        discriminator: discriminator.name.clone(),
        branches,
    })
}

fn select_branch<'p, P: Page>(page: &'p P, section: &P::Element<'p>, literal: &str) -> bool {
    let Some(control) = find_branch_control(section, literal) else {
        return false;
    };
    if let Err(e) = control.click() {
        debug!(literal, error = %e, "Branch click failed");
        return false;
    }
    page.pause(BRANCH_SETTLE);
    // Nested objects of the new branch render collapsed
    expand_nested(page);
    true
}

/// The first control, by selector priority, whose label or value names `literal`.
pub fn find_branch_control<E: Element>(section: &E, literal: &str) -> Option<E> {
    let wanted = normalize_label(literal);
    CONTROL_SELECTORS.iter().find_map(|selector| {
        section.find_all(selector).into_iter().find(|el| {
            normalize_label(&el.text()) == wanted
                || ["value", "data-value"]
                    .iter()
                    .filter_map(|attr| el.attribute(attr))
                    .any(|v| normalize_label(&v) == wanted)
        })
    })
}

/// Lowercase with spaces, underscores and hyphens removed.
pub fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::scripted::ScriptedPage;
    use crate::dom::HtmlPage;
    use crate::parser::depth::{DepthResolver, FirstSeenDepth};
    use crate::parser::hierarchy::build_hierarchy;
    use crate::parser::rows::extract_rows;

    fn prop(name: &str, ty: &str) -> Property {
        Property {
            name: name.into(),
            ty: ty.into(),
            ..Default::default()
        }
    }

    fn action(values: &[&str]) -> Property {
        Property {
            r#enum: values.iter().map(|v| v.to_string()).collect(),
            ..prop("action", "string")
        }
    }

    #[test]
    fn discriminator_is_first_scalar_enum() {
        let mut list = prop("modes", "array of string");
        list.is_array = true;
        list.r#enum = vec!["A".into(), "B".into()];
        let props = vec![
            action(&["ONLY"]),
            list,
            action(&["AUTHORIZE_GUEST_ACCESS", "UNAUTHORIZE_GUEST_ACCESS"]),
            prop("type", "string"),
        ];
        let picked = pick_discriminator(&props).unwrap();
        assert_eq!(picked.r#enum.len(), 2);
        assert!(!picked.is_array);
    }

    #[test]
    fn no_discriminator_without_enums() {
        assert!(pick_discriminator(&[prop("name", "string"), prop("enabled", "boolean")]).is_none());
    }

    #[test]
    fn shape_ignores_descriptions_only() {
        let mut a = prop("limit", "integer");
        let mut b = a.clone();
        a.description = "Minutes".into();
        b.description = "Something else".into();
        assert!(same_shape(&[a.clone()], &[b.clone()]));

        b.required = true;
        assert!(!same_shape(&[a.clone()], &[b]));

        let mut c = a.clone();
        c.r#enum = vec!["X".into(), "Y".into()];
        let mut d = a.clone();
        d.r#enum = vec!["Y".into(), "X".into()];
        assert!(!same_shape(&[c], &[d]));
    }

    #[test]
    fn shape_compares_children() {
        let mut a = prop("data", "object");
        a.children = vec![prop("id", "string")];
        let mut b = a.clone();
        b.children[0].ty = "integer".into();
        assert!(!same_shape(&[a.clone()], &[b]));
        assert!(same_shape(&[a.clone()], &[a]));
    }

    #[test]
    fn collect_skips_unselectable_and_empty_branches() {
        let literals: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
        let current = std::cell::RefCell::new(String::new());
        let branches = collect_branches(
            &literals,
            |lit| {
                *current.borrow_mut() = lit.to_string();
                lit != "B"
            },
            || match current.borrow().as_str() {
                "C" => Vec::new(),
                other => vec![prop(&format!("field_{}", other.to_lowercase()), "string")],
            },
        );
        let keys: Vec<&str> = branches.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["A", "D"]);
    }

    #[test]
    fn accepts_distinct_branches() {
        let branches = vec![
            ("AUTHORIZE_GUEST_ACCESS".to_string(), vec![prop("action", "string"), prop("timeLimitMinutes", "integer")]),
            ("UNAUTHORIZE_GUEST_ACCESS".to_string(), vec![prop("action", "string")]),
        ];
        let accepted = accept_branches(branches).unwrap();
        assert_eq!(accepted.len(), 2);
        assert_eq!(accepted.keys().next().unwrap(), "AUTHORIZE_GUEST_ACCESS");
    }

    #[test]
    fn rejects_identical_branches() {
        let tree = vec![prop("action", "string"), prop("note", "string")];
        let mut described = tree.clone();
        described[1].description = "differs only here".into();
        let branches = vec![("A".to_string(), tree.clone()), ("B".to_string(), described), ("C".to_string(), tree)];
        assert!(accept_branches(branches).is_none());
    }

    #[test]
    fn rejects_single_branch() {
        assert!(accept_branches(vec![("A".to_string(), vec![prop("x", "string")])]).is_none());
    }

    #[test]
    fn normalized_labels() {
        assert_eq!(normalize_label("Authorize Guest-Access"), "authorizeguestaccess");
        assert_eq!(normalize_label("AUTHORIZE_GUEST_ACCESS"), "authorizeguestaccess");
    }

    #[test]
    fn control_lookup_prefers_buttons_and_reads_values() {
        let page = HtmlPage::parse(
            r#"<section>
                 <label>Restart</label>
                 <button>restart</button>
                 <div class="Segment__Item" data-value="POWER_CYCLE_PORT">Cycle</div>
               </section>"#,
        );
        let section = page.find("section").unwrap();
        let restart = find_branch_control(&section, "RESTART").unwrap();
        assert_eq!(restart.attribute("class"), None);
        assert_eq!(restart.text(), "restart");
        let cycle = find_branch_control(&section, "power-cycle port").unwrap();
        assert_eq!(cycle.text(), "Cycle");
        assert!(find_branch_control(&section, "LOCATE").is_none());
    }

    #[test]
    fn static_snapshot_never_yields_variants() {
        // Clicks do nothing on a snapshot, so every branch reads the same rows
        let page = HtmlPage::parse(
            r#"<section>
                 <button>A</button><button>B</button>
                 <div class="PropertyRow r0"><span class="PropertyName">kind</span><span class="PropertyType">string</span></div>
               </section>"#,
        );
        let section = page.find("section").unwrap();
        let props = vec![action(&["A", "B"])];
        let mut depth = FirstSeenDepth::new();
        let extract = || {
            depth.reset();
            build_hierarchy(&extract_rows(&section, &mut depth))
        };
        assert!(discover_variants(&page, &section, &props, extract).is_none());
    }

    const BRANCH_A: &str = r#"<section>
          <button>GRANT</button><button>REVOKE</button>
          <div class="PropertyRow r0"><span class="PropertyName">action</span><span class="PropertyType">string</span></div>
          <div class="PropertyRow r0"><span class="PropertyName">minutes</span><span class="PropertyType">integer</span></div>
        </section>"#;
    const BRANCH_B: &str = r#"<section>
          <button>GRANT</button><button>REVOKE</button>
          <div class="PropertyRow r0"><span class="PropertyName">action</span><span class="PropertyType">string</span></div>
          <div class="PropertyRow r0"><span class="PropertyName">reason</span><span class="PropertyType">string</span></div>
        </section>"#;

    #[test]
    fn clicks_that_change_rows_yield_variants() {
        let page = ScriptedPage::new(&[("GRANT", BRANCH_A), ("REVOKE", BRANCH_B)]);
        let section = page.find("section").unwrap();
        let props = vec![action(&["GRANT", "REVOKE"])];
        let mut depth = FirstSeenDepth::new();
        let extract = || {
            depth.reset();
            build_hierarchy(&extract_rows(&section, &mut depth))
        };

        let variants = discover_variants(&page, &section, &props, extract).unwrap();
        assert_eq!(variants.discriminator, "action");
        let keys: Vec<&str> = variants.branches.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["GRANT", "REVOKE"]);
        let fields = |k: &str| variants.branches[k].iter().map(|p| p.name.clone()).collect::<Vec<_>>();
        assert_eq!(fields("GRANT"), vec!["action", "minutes"]);
        assert_eq!(fields("REVOKE"), vec!["action", "reason"]);
        // Last selection stays on screen
        assert_eq!(page.state(), "REVOKE");
    }

    #[test]
    fn literal_without_a_control_is_skipped() {
        let page = ScriptedPage::new(&[("GRANT", BRANCH_A), ("REVOKE", BRANCH_B)]);
        let section = page.find("section").unwrap();
        let props = vec![action(&["GRANT", "LOCATE"])];
        let mut depth = FirstSeenDepth::new();
        let extract = || {
            depth.reset();
            build_hierarchy(&extract_rows(&section, &mut depth))
        };
        // Only one branch can be selected, which is not a union
        assert!(discover_variants(&page, &section, &props, extract).is_none());
    }
}
