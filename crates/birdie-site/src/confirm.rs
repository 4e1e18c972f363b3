use crate::selectors;
use crate::{Error, Result};
use birdie_browser::{eval_bool, is_disabled, Locator, WaitFor};
use std::time::Duration;
use tokio::time::sleep;

// The review screen renders its terms section a beat after navigation.
const REVIEW_RENDER_DELAY: Duration = Duration::from_secs(2);

/// Advance from the date/players step to the tee-time listing.
pub async fn continue_to_slots(locator: &Locator) -> Result<()> {
    click_enabled(locator, &selectors::continue_button(), "continue").await
}

/// Advance from the chosen slot to the review screen.
pub async fn continue_to_review(locator: &Locator) -> Result<()> {
    click_enabled(locator, &selectors::final_continue_button(), "final continue").await
}

/// Tick the terms-and-conditions checkbox if it isn't already.
pub async fn accept_terms(locator: &Locator) -> Result<()> {
    sleep(REVIEW_RENDER_DELAY).await;

    let checkbox = locator
        .find(&selectors::terms_checkbox(), WaitFor::Present, None)
        .await?;
    let _ = checkbox.scroll_into_view().await;

    if eval_bool(&checkbox, "function() { return this.checked; }").await? {
        tracing::debug!("terms checkbox already ticked");
        return Ok(());
    }

    locator.click(&checkbox).await.map_err(Error::from)
}

/// Final confirmation click; after this the booking is placed.
pub async fn confirm_booking(locator: &Locator) -> Result<()> {
    click_enabled(locator, &selectors::confirm_button(), "confirm").await?;
    tracing::info!("booking confirmed");
    Ok(())
}

async fn click_enabled(
    locator: &Locator,
    selectors: &[birdie_browser::Selector],
    label: &str,
) -> Result<()> {
    let button = locator.find(selectors, WaitFor::Clickable, None).await?;

    if is_disabled(&button).await? {
        return Err(Error::Step(format!("{} button is disabled", label)));
    }

    locator.click(&button).await.map_err(Error::from)
}
