//! A page that changes when its controls are clicked, built from static HTML states.
//!
//! Each state is a full HTML document. Clicking an element whose text or `value` names a
//! state switches the page to it. Elements are addressed by their lookup path, so a handle
//! taken before a click reads the new state afterwards, like a live DOM.

use std::cell::Cell;
use std::time::Duration;

use anyhow::Result;

use super::html::{HtmlElement, HtmlPage};
use super::{Element, Page};

pub struct ScriptedPage {
    states: Vec<(String, HtmlPage)>,
    current: Cell<usize>,
}

impl ScriptedPage {
    /// The first state is shown initially.
    pub fn new(states: &[(&str, &str)]) -> Self {
        Self {
            states: states
                .iter()
                .map(|(name, html)| (name.to_string(), HtmlPage::parse(html)))
                .collect(),
            current: Cell::new(0),
        }
    }

    pub fn state(&self) -> &str {
        &self.states[self.current.get()].0
    }

    fn document(&self) -> &HtmlPage {
        &self.states[self.current.get()].1
    }

    fn switch_to(&self, name: &str) -> bool {
        match self.states.iter().position(|(n, _)| n == name) {
            Some(idx) => {
                self.current.set(idx);
                true
            }
            None => false,
        }
    }
}

impl Page for ScriptedPage {
    type Element<'a> = ScriptedElement<'a>;

    fn find_all(&self, selector: &str) -> Vec<ScriptedElement<'_>> {
        let count = self.document().find_all(selector).len();
        (0..count)
            .map(|idx| ScriptedElement {
                page: self,
                path: vec![(selector.to_string(), idx)],
            })
            .collect()
    }

    fn wait_for_load(&self) -> Result<()> {
        Ok(())
    }

    fn pause(&self, _duration: Duration) {}
}

pub struct ScriptedElement<'a> {
    page: &'a ScriptedPage,
    path: Vec<(String, usize)>,
}

impl<'a> ScriptedElement<'a> {
    fn resolve(&self) -> Option<HtmlElement<'a>> {
        let doc = self.page.document();
        let ((first, idx), rest) = self.path.split_first()?;
        let mut el = doc.find_all(first).into_iter().nth(*idx)?;
        for (selector, idx) in rest {
            el = el.find_all(selector).into_iter().nth(*idx)?;
        }
        Some(el)
    }
}

impl Element for ScriptedElement<'_> {
    fn text(&self) -> String {
        self.resolve().map(|el| el.text()).unwrap_or_default()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.resolve()?.attribute(name)
    }

    fn find_all(&self, selector: &str) -> Vec<Self> {
        let count = self.resolve().map_or(0, |el| el.find_all(selector).len());
        (0..count)
            .map(|idx| {
                let mut path = self.path.clone();
                path.push((selector.to_string(), idx));
                ScriptedElement { page: self.page, path }
            })
            .collect()
    }

    fn click(&self) -> Result<()> {
        let Some(el) = self.resolve() else {
            anyhow::bail!("element is gone");
        };
        let target = el.attribute("value").unwrap_or_else(|| el.text());
        self.page.switch_to(&target);
        Ok(())
    }

    fn is_visible(&self) -> bool {
        self.resolve().is_some_and(|el| el.is_visible())
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_follow_the_state_switch() {
        let page = ScriptedPage::new(&[
            ("A", "<section><button>B</button><p>first</p></section>"),
            ("B", "<section><button>A</button><p>second</p><p>extra</p></section>"),
        ]);
        let section = page.find("section").unwrap();
        assert_eq!(section.find_all("p").len(), 1);

        section.find("button").unwrap().click().unwrap();
        assert_eq!(page.state(), "B");
        assert_eq!(section.find_all("p").len(), 2);
        assert_eq!(section.find("p").unwrap().text(), "second");
    }
}
