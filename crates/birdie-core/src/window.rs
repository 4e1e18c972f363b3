use crate::{Error, Result};
use chrono::NaiveTime;

/// Preferred tee-time window, parsed from an "HH:MM-HH:MM" string.
///
/// Both bounds are inclusive: a slot at exactly the start or end time is
/// considered inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidWindow(format!(
                "window start {} is after end {}",
                start.format("%H:%M"),
                end.format("%H:%M")
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse a window pattern like "08:00-11:00".
    pub fn parse(pattern: &str) -> Result<Self> {
        let (start_str, end_str) = pattern.split_once('-').ok_or_else(|| {
            Error::InvalidWindow(format!("expected HH:MM-HH:MM, got '{}'", pattern))
        })?;

        let start = NaiveTime::parse_from_str(start_str.trim(), "%H:%M")
            .map_err(|_| Error::InvalidWindow(format!("invalid start time: {}", start_str)))?;
        let end = NaiveTime::parse_from_str(end_str.trim(), "%H:%M")
            .map_err(|_| Error::InvalidWindow(format!("invalid end time: {}", end_str)))?;

        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.start && time <= self.end
    }

    /// Pick the slot to book from a list of candidates.
    ///
    /// Candidates outside the window are dropped; the remainder is sorted by
    /// time and the middle one is chosen, so the pick sits away from the
    /// contested edges of the window.
    pub fn select<T>(&self, slots: Vec<(NaiveTime, T)>) -> Option<(NaiveTime, T)> {
        let mut matching: Vec<(NaiveTime, T)> = slots
            .into_iter()
            .filter(|(time, _)| self.contains(*time))
            .collect();

        if matching.is_empty() {
            return None;
        }

        matching.sort_by_key(|(time, _)| *time);
        let middle = matching.len() / 2;
        Some(matching.swap_remove(middle))
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_parse_valid_window() {
        let window = TimeWindow::parse("08:00-11:00").unwrap();
        assert_eq!(window.start(), t(8, 0));
        assert_eq!(window.end(), t(11, 0));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let window = TimeWindow::parse("08:00 - 11:00").unwrap();
        assert_eq!(window.start(), t(8, 0));
        assert_eq!(window.end(), t(11, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(TimeWindow::parse("morning").is_err());
        assert!(TimeWindow::parse("8am-11am").is_err());
        assert!(TimeWindow::parse("08:00").is_err());
    }

    #[test]
    fn test_parse_rejects_inverted_window() {
        let result = TimeWindow::parse("11:00-08:00");
        assert!(result.is_err());
    }

    #[test]
    fn test_contains_is_inclusive_on_both_ends() {
        let window = TimeWindow::parse("08:00-11:00").unwrap();
        assert!(window.contains(t(8, 0)));
        assert!(window.contains(t(11, 0)));
        assert!(window.contains(t(9, 30)));
        assert!(!window.contains(t(7, 59)));
        assert!(!window.contains(t(11, 1)));
    }

    #[test]
    fn test_select_picks_middle_slot() {
        let window = TimeWindow::parse("08:00-11:00").unwrap();
        let slots = vec![
            (t(8, 10), "a"),
            (t(9, 0), "b"),
            (t(10, 30), "c"),
        ];

        let (time, label) = window.select(slots).unwrap();
        assert_eq!(time, t(9, 0));
        assert_eq!(label, "b");
    }

    #[test]
    fn test_select_sorts_before_picking() {
        let window = TimeWindow::parse("08:00-11:00").unwrap();
        let slots = vec![
            (t(10, 30), "late"),
            (t(8, 10), "early"),
            (t(9, 0), "mid"),
        ];

        let (time, label) = window.select(slots).unwrap();
        assert_eq!(time, t(9, 0));
        assert_eq!(label, "mid");
    }

    #[test]
    fn test_select_drops_slots_outside_window() {
        let window = TimeWindow::parse("08:00-11:00").unwrap();
        let slots = vec![
            (t(6, 0), "too-early"),
            (t(9, 0), "ok"),
            (t(13, 0), "too-late"),
        ];

        let (time, label) = window.select(slots).unwrap();
        assert_eq!(time, t(9, 0));
        assert_eq!(label, "ok");
    }

    #[test]
    fn test_select_returns_none_when_nothing_matches() {
        let window = TimeWindow::parse("08:00-11:00").unwrap();
        let slots = vec![(t(6, 0), "too-early"), (t(13, 0), "too-late")];
        assert!(window.select(slots).is_none());
    }
}
