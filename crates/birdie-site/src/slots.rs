use crate::selectors;
use crate::{Error, Result};
use birdie_browser::{eval_bool, eval_string, eval_unit, Element, Locator};
use birdie_core::TimeWindow;
use chrono::NaiveTime;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TIME_LABEL: Regex =
        Regex::new(r"(?i)\b(\d{1,2}):(\d{2})\s*(AM|PM)?").expect("valid regex");
}

// Slot rows pair a time tag with a rate link; the rate link carries the
// disabled class once the slot is taken.
const TIME_TAG_JS: &str = "function() { \
     const tag = this.querySelector('div.widget-teetime-tag'); \
     return tag ? tag.innerText : null; \
 }";
const RATE_AVAILABLE_JS: &str = "function() { \
     const rate = this.querySelector('a.widget-teetime-rate'); \
     return !!rate && !rate.className.includes('disabled'); \
 }";
const RATE_CLICK_JS: &str = "function() { \
     this.querySelector('a.widget-teetime-rate').click(); \
 }";

/// Pick and click a tee time inside the preferred window.
///
/// Returns the slot's time on success. An empty listing means the release
/// has not landed yet; both that and a window with no open slot are
/// transient, the caller's retry loop refreshes and tries again.
pub async fn book_slot_in_window(locator: &Locator, window: &TimeWindow) -> Result<NaiveTime> {
    let containers = locator
        .find_all(&selectors::slot_containers(), None)
        .await?;
    if containers.is_empty() {
        return Err(Error::SlotsNotReleased);
    }

    let mut candidates: Vec<(NaiveTime, Element)> = Vec::new();
    for container in containers {
        let Some(label) = eval_string(&container, TIME_TAG_JS).await? else {
            continue;
        };
        let Some(time) = parse_slot_time(&label) else {
            tracing::debug!("unparseable slot label '{}'", label.trim());
            continue;
        };
        if !eval_bool(&container, RATE_AVAILABLE_JS).await? {
            continue;
        }
        candidates.push((time, container));
    }

    tracing::debug!("{} bookable slots on the page", candidates.len());

    let (time, container) = window.select(candidates).ok_or(Error::NoSlotInWindow)?;
    eval_unit(&container, RATE_CLICK_JS).await?;

    tracing::info!("selected {} tee time", time.format("%H:%M"));
    Ok(time)
}

/// Parse a slot label like "7:30 AM" or "07:30".
fn parse_slot_time(text: &str) -> Option<NaiveTime> {
    let caps = TIME_LABEL.captures(text)?;
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;
    let meridiem = caps.get(3).map(|m| m.as_str().to_ascii_uppercase());

    let hour = match meridiem.as_deref() {
        Some("PM") if hour != 12 => hour + 12,
        Some("AM") if hour == 12 => 0,
        _ => hour,
    };

    NaiveTime::from_hms_opt(hour, minute, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_parse_twelve_hour_labels() {
        assert_eq!(parse_slot_time("7:30 AM"), Some(t(7, 30)));
        assert_eq!(parse_slot_time("2:10 PM"), Some(t(14, 10)));
        assert_eq!(parse_slot_time("12:05 PM"), Some(t(12, 5)));
        assert_eq!(parse_slot_time("12:10 AM"), Some(t(0, 10)));
    }

    #[test]
    fn test_parse_twenty_four_hour_labels() {
        assert_eq!(parse_slot_time("07:30"), Some(t(7, 30)));
        assert_eq!(parse_slot_time("14:10"), Some(t(14, 10)));
    }

    #[test]
    fn test_parse_tolerates_surrounding_text() {
        assert_eq!(parse_slot_time("  9:40 am \n $52.00"), Some(t(9, 40)));
    }

    #[test]
    fn test_parse_rejects_label_without_time() {
        assert_eq!(parse_slot_time("Sold out"), None);
        assert_eq!(parse_slot_time(""), None);
    }

    #[test]
    fn test_parse_rejects_impossible_time() {
        assert_eq!(parse_slot_time("99:99"), None);
    }
}
