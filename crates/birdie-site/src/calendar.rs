use crate::selectors;
use crate::{Error, Result};
use birdie_browser::{is_disabled, Locator, WaitFor};
use chrono::{Datelike, NaiveDate};

/// The datepicker only ever needs to move forward a handful of months for a
/// seven-day advance window; anything past this means the title parse and
/// the navigation are out of sync.
const MAX_MONTH_HOPS: u32 = 12;

/// Select `target` in the widget's calendar, paging forward month by month
/// first if needed.
pub async fn select_date(locator: &Locator, target: NaiveDate) -> Result<()> {
    tracing::info!("selecting date {}", target);

    navigate_to_month(locator, target).await?;
    click_day(locator, target).await
}

async fn navigate_to_month(locator: &Locator, target: NaiveDate) -> Result<()> {
    for _ in 0..MAX_MONTH_HOPS {
        let title = locator
            .find(&selectors::month_title(), WaitFor::Visible, None)
            .await?;
        let text = title
            .inner_text()
            .await
            .map_err(birdie_browser::Error::from)?
            .unwrap_or_default();
        let (year, month) = parse_month_title(text.trim())?;

        if (year, month) == (target.year(), target.month()) {
            return Ok(());
        }
        if (year, month) > (target.year(), target.month()) {
            return Err(Error::Step(format!(
                "calendar shows {}, past the month of {}",
                text.trim(),
                target
            )));
        }

        let next = locator
            .find(&selectors::month_next_button(), WaitFor::Clickable, None)
            .await?;
        locator.click(&next).await?;
    }

    Err(Error::Step(format!(
        "calendar never reached the month of {}",
        target
    )))
}

async fn click_day(locator: &Locator, target: NaiveDate) -> Result<()> {
    let day = locator
        .find(&selectors::day_button(target.day()), WaitFor::Visible, None)
        .await?;

    if is_disabled(&day).await? {
        return Err(Error::Step(format!("day {} is not yet bookable", target)));
    }

    locator.click(&day).await
        .map_err(Error::from)
}

/// Parse the datepicker title, e.g. "August 2026".
fn parse_month_title(title: &str) -> Result<(i32, u32)> {
    let padded = format!("01 {}", title);
    let date = NaiveDate::parse_from_str(&padded, "%d %B %Y")
        .map_err(|_| Error::Step(format!("unreadable month title '{}'", title)))?;
    Ok((date.year(), date.month()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month_title() {
        assert_eq!(parse_month_title("August 2026").unwrap(), (2026, 8));
        assert_eq!(parse_month_title("January 2027").unwrap(), (2027, 1));
    }

    #[test]
    fn test_parse_month_title_rejects_garbage() {
        assert!(parse_month_title("Sometime 2026").is_err());
        assert!(parse_month_title("").is_err());
    }

    #[test]
    fn test_month_ordering_comparison() {
        // (year, month) tuples order the way the navigation loop needs.
        assert!((2026, 12) < (2027, 1));
        assert!((2027, 2) > (2026, 12));
    }
}
