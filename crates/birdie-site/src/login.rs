use crate::selectors;
use crate::{Error, Result};
use birdie_browser::{Locator, WaitFor};
use std::time::Duration;

/// How long the post-submit session check may take. Login is the one step
/// where the site itself round-trips, so this is far above the element
/// default.
const LOGIN_VERIFY_TIMEOUT: Duration = Duration::from_secs(15);

/// Authenticate as a member through the widget's login tab.
///
/// Failure here is fatal for the run: nothing downstream works without a
/// member session, and retrying bad credentials only locks the account.
pub async fn login(locator: &Locator, email: &str, password: &str) -> Result<()> {
    tracing::info!("logging in as {}", email);

    let tab = locator
        .find(&selectors::members_tab(), WaitFor::Clickable, None)
        .await?;
    locator.click(&tab).await?;

    let email_field = locator
        .find(&selectors::email_field(), WaitFor::Visible, None)
        .await?;
    locator.type_into(&email_field, email).await?;

    let password_field = locator
        .find(&selectors::password_field(), WaitFor::Visible, None)
        .await?;
    locator.type_into(&password_field, password).await?;

    let submit = locator
        .find(&selectors::login_button(), WaitFor::Clickable, None)
        .await?;
    locator.click(&submit).await?;

    locator
        .find(
            &selectors::logout_link(),
            WaitFor::Visible,
            Some(LOGIN_VERIFY_TIMEOUT),
        )
        .await
        .map_err(|_| {
            Error::LoginFailed(format!(
                "no member session after submitting credentials for {}",
                email
            ))
        })?;

    tracing::info!("login verified");
    Ok(())
}
