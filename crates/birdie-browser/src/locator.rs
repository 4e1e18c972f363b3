use crate::{Error, Result};
use chromiumoxide::element::Element;
use chromiumoxide::Page;
use std::time::Duration;
use tokio::time::{sleep, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(250);
const CLICK_ATTEMPTS: u32 = 3;
const AFTER_CLICK_DELAY: Duration = Duration::from_millis(500);

/// One way of addressing an element. Flows hand the locator an ordered list
/// of these; the first one that resolves wins, so markup drift on the site
/// degrades to a fallback instead of a failure.
#[derive(Debug, Clone)]
pub enum Selector {
    /// Plain CSS selector.
    Css(String),
    /// CSS selector narrowed to elements whose inner text contains a value.
    Text { css: String, contains: String },
}

impl Selector {
    pub fn css(selector: impl Into<String>) -> Self {
        Selector::Css(selector.into())
    }

    pub fn text(css: impl Into<String>, contains: impl Into<String>) -> Self {
        Selector::Text {
            css: css.into(),
            contains: contains.into(),
        }
    }

    fn describe(&self) -> String {
        match self {
            Selector::Css(css) => css.clone(),
            Selector::Text { css, contains } => format!("{} [text~'{}']", css, contains),
        }
    }
}

/// What state the element must be in before `find` hands it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitFor {
    /// Attached to the DOM.
    Present,
    /// Has a non-empty bounding box.
    Visible,
    /// Visible and not disabled.
    Clickable,
}

/// Evaluate a JS function against the element, reading back a boolean.
pub async fn eval_bool(element: &Element, function: &str) -> Result<bool> {
    let returns = element.call_js_fn(function, false).await?;
    Ok(returns
        .result
        .value
        .and_then(|v| v.as_bool())
        .unwrap_or(false))
}

/// Evaluate a JS function against the element, reading back a string.
pub async fn eval_string(element: &Element, function: &str) -> Result<Option<String>> {
    let returns = element.call_js_fn(function, false).await?;
    Ok(returns
        .result
        .value
        .and_then(|v| v.as_str().map(str::to_string)))
}

/// Evaluate a JS function against the element for its side effect.
pub async fn eval_unit(element: &Element, function: &str) -> Result<()> {
    element.call_js_fn(function, false).await?;
    Ok(())
}

/// Whether the element is disabled, by attribute or by class.
pub async fn is_disabled(element: &Element) -> Result<bool> {
    if element.attribute("disabled").await?.is_some() {
        return Ok(true);
    }
    let class = element.attribute("class").await?.unwrap_or_default();
    Ok(class.contains("disabled"))
}

/// Finds and drives elements on one page with fallback selectors, wait
/// conditions, and bounded polling.
pub struct Locator {
    page: Page,
    default_timeout: Duration,
}

impl Locator {
    pub fn new(page: Page, default_timeout: Duration) -> Self {
        Self {
            page,
            default_timeout,
        }
    }

    /// Find the first element matching any of `selectors` in order, waiting
    /// up to `timeout` (the locator default when `None`) for it to reach
    /// the requested state.
    pub async fn find(
        &self,
        selectors: &[Selector],
        wait: WaitFor,
        timeout: Option<Duration>,
    ) -> Result<Element> {
        let timeout = timeout.unwrap_or(self.default_timeout);
        let deadline = Instant::now() + timeout;

        loop {
            for selector in selectors {
                if let Some(element) = self.resolve(selector).await {
                    if self.satisfies(&element, wait).await {
                        return Ok(element);
                    }
                }
            }

            if Instant::now() >= deadline {
                break;
            }
            sleep(POLL_INTERVAL).await;
        }

        Err(Error::ElementNotFound(
            selectors
                .iter()
                .map(Selector::describe)
                .collect::<Vec<_>>()
                .join(" | "),
        ))
    }

    /// Collect every element matching the first selector that yields any,
    /// polling up to `timeout`. An empty result is not an error: absent
    /// tee-time listings are a normal pre-release state.
    pub async fn find_all(
        &self,
        selectors: &[Selector],
        timeout: Option<Duration>,
    ) -> Result<Vec<Element>> {
        let timeout = timeout.unwrap_or(self.default_timeout);
        let deadline = Instant::now() + timeout;

        loop {
            for selector in selectors {
                let found = self.resolve_all(selector).await;
                if !found.is_empty() {
                    return Ok(found);
                }
            }

            if Instant::now() >= deadline {
                return Ok(Vec::new());
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    /// Click with retries: native click first, scrolling into view between
    /// attempts, then a JavaScript click as the last resort (overlays on
    /// the booking widget intercept native clicks now and then).
    pub async fn click(&self, element: &Element) -> Result<()> {
        for attempt in 1..=CLICK_ATTEMPTS {
            match element.click().await {
                Ok(_) => {
                    sleep(AFTER_CLICK_DELAY).await;
                    return Ok(());
                }
                Err(e) => {
                    tracing::debug!("click attempt {} failed: {}", attempt, e);
                    let _ = element.scroll_into_view().await;
                    sleep(Duration::from_millis(250)).await;
                }
            }
        }

        element.call_js_fn("function() { this.click(); }", false).await?;
        sleep(AFTER_CLICK_DELAY).await;
        Ok(())
    }

    /// Clear the field and type `text` into it.
    pub async fn type_into(&self, element: &Element, text: &str) -> Result<()> {
        element.focus().await?;
        element
            .call_js_fn("function() { this.value = ''; }", false)
            .await?;
        element.type_str(text).await?;
        Ok(())
    }

    async fn resolve(&self, selector: &Selector) -> Option<Element> {
        match selector {
            Selector::Css(css) => self.page.find_element(css.as_str()).await.ok(),
            Selector::Text { css, contains } => {
                let candidates = self.page.find_elements(css.as_str()).await.ok()?;
                for element in candidates {
                    if let Ok(Some(text)) = element.inner_text().await {
                        if text.contains(contains.as_str()) {
                            return Some(element);
                        }
                    }
                }
                None
            }
        }
    }

    async fn resolve_all(&self, selector: &Selector) -> Vec<Element> {
        match selector {
            Selector::Css(css) => self
                .page
                .find_elements(css.as_str())
                .await
                .unwrap_or_default(),
            Selector::Text { css, contains } => {
                let mut matching = Vec::new();
                for element in self
                    .page
                    .find_elements(css.as_str())
                    .await
                    .unwrap_or_default()
                {
                    if let Ok(Some(text)) = element.inner_text().await {
                        if text.contains(contains.as_str()) {
                            matching.push(element);
                        }
                    }
                }
                matching
            }
        }
    }

    async fn satisfies(&self, element: &Element, wait: WaitFor) -> bool {
        match wait {
            WaitFor::Present => true,
            WaitFor::Visible => self.is_visible(element).await,
            WaitFor::Clickable => {
                self.is_visible(element).await && !is_disabled(element).await.unwrap_or(true)
            }
        }
    }

    async fn is_visible(&self, element: &Element) -> bool {
        eval_bool(
            element,
            "function() { const r = this.getBoundingClientRect(); return r.width > 0 && r.height > 0; }",
        )
        .await
        .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_describe_includes_text_filter() {
        let css = Selector::css("button.primary");
        assert_eq!(css.describe(), "button.primary");

        let text = Selector::text("a.toggler", "3");
        assert_eq!(text.describe(), "a.toggler [text~'3']");
    }

    // Find/click behavior needs a live Chrome page and is exercised through
    // the booking flows against a real widget.
}
