use crate::selectors;
use crate::{Error, Result};
use birdie_browser::{is_disabled, Locator, WaitFor};

/// Pick the party size. The widget disables counts the selected date can't
/// accommodate, which reads as a transient state right after a release.
pub async fn select_players(locator: &Locator, players: u32) -> Result<()> {
    tracing::info!("selecting {} players", players);

    let button = locator
        .find(&selectors::player_button(players), WaitFor::Visible, None)
        .await?;

    if is_disabled(&button).await? {
        return Err(Error::Step(format!(
            "{}-player option is disabled",
            players
        )));
    }

    locator.click(&button).await.map_err(Error::from)
}
