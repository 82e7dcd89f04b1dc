use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use headless_chrome::{LaunchOptions, Tab};
use tracing::debug;

use super::{Browser, Element, Page};

/// One headless Chrome process. Dropping it shuts the process down, so a worker that
/// owns one releases it on every exit path, panics included.
pub struct ChromeBrowser {
    browser: headless_chrome::Browser,
}

impl ChromeBrowser {
    pub fn launch() -> Result<Self> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .build()
            .map_err(|e| anyhow!("Invalid Chrome launch options: {}", e))?;
        let browser =
            headless_chrome::Browser::new(options).context("Failed to launch headless Chrome")?;
        Ok(Self { browser })
    }
}

impl Browser for ChromeBrowser {
    type Page = ChromePage;

    fn open(&self, url: &str) -> Result<ChromePage> {
        let tab = self.browser.new_tab().context("Failed to open tab")?;
        tab.navigate_to(url)
            .with_context(|| format!("Navigation to {} failed", url))?;
        Ok(ChromePage { tab })
    }
}

pub struct ChromePage {
    tab: Arc<Tab>,
}

impl Page for ChromePage {
    type Element<'a> = ChromeElement<'a>;

    fn find_all(&self, selector: &str) -> Vec<ChromeElement<'_>> {
        match self.tab.find_elements(selector) {
            Ok(found) => found.into_iter().map(|inner| ChromeElement { inner }).collect(),
            Err(e) => {
                debug!(selector, error = %e, "No elements");
                Vec::new()
            }
        }
    }

    fn wait_for_load(&self) -> Result<()> {
        self.tab
            .wait_until_navigated()
            .context("Page load failed")?;
        Ok(())
    }
}

impl Drop for ChromePage {
    fn drop(&mut self) {
        if let Err(e) = self.tab.close(true) {
            debug!(error = %e, "Tab close failed");
        }
    }
}

pub struct ChromeElement<'a> {
    inner: headless_chrome::Element<'a>,
}

impl Element for ChromeElement<'_> {
    fn text(&self) -> String {
        self.inner
            .get_inner_text()
            .map(|t| t.trim().to_string())
            .unwrap_or_default()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        // CDP reports attributes as a flat [name, value, name, value, ...] list
        let attrs = self.inner.get_attributes().ok()??;
        attrs
            .chunks(2)
            .find(|pair| pair[0] == name)
            .and_then(|pair| pair.get(1).cloned())
    }

    fn find_all(&self, selector: &str) -> Vec<Self> {
        self.inner
            .find_elements(selector)
            .map(|found| found.into_iter().map(|inner| ChromeElement { inner }).collect())
            .unwrap_or_default()
    }

    fn click(&self) -> Result<()> {
        self.inner.click().context("Click failed")?;
        Ok(())
    }

    fn is_visible(&self) -> bool {
        // Elements that are not rendered have no box model
        self.inner
            .get_box_model()
            .map(|b| b.width > 0.0 && b.height > 0.0)
            .unwrap_or(false)
    }
}
