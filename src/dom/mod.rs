//! The slice of browser automation the scraper relies on.
//!
//! Everything in `parser` and `discovery` is written against these traits, so the same
//! extraction runs on a live Chrome tab (`chrome`) or on a static HTML snapshot (`html`).
//! Lookups never fail: a missing element is `None` or an empty `Vec`. Only opening a page
//! and clicking return errors.

pub mod chrome;
pub mod html;
#[cfg(test)]
pub mod scripted;

use std::time::Duration;

use anyhow::Result;

pub use chrome::ChromeBrowser;
pub use html::{HtmlBrowser, HtmlPage};

pub trait Element: Sized {
    /// Rendered text, whitespace-trimmed.
    fn text(&self) -> String;

    fn attribute(&self, name: &str) -> Option<String>;

    /// Descendants matching a CSS selector, in document order.
    fn find_all(&self, selector: &str) -> Vec<Self>;

    fn find(&self, selector: &str) -> Option<Self> {
        self.find_all(selector).into_iter().next()
    }

    fn click(&self) -> Result<()>;

    fn is_visible(&self) -> bool;
}

pub trait Page {
    type Element<'a>: Element
    where
        Self: 'a;

    fn find_all(&self, selector: &str) -> Vec<Self::Element<'_>>;

    fn find(&self, selector: &str) -> Option<Self::Element<'_>> {
        self.find_all(selector).into_iter().next()
    }

    fn wait_for_load(&self) -> Result<()>;

    /// Fixed wait for client-side rendering to catch up.
    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Opens documentation pages. Not shared between workers: each worker owns one.
pub trait Browser {
    type Page: Page;

    fn open(&self, url: &str) -> Result<Self::Page>;
}
