use crate::retry::RetryPolicy;
use crate::schedule::ReleaseSchedule;
use crate::window::TimeWindow;
use crate::{Error, Result};
use chrono::NaiveTime;
use std::time::Duration;
use url::Url;

/// How a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Run the whole flow immediately, once, without waiting for a release.
    Test,
    /// Wait for the release instant, then attempt on the retry budget.
    Scheduled,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Test => "test",
            Mode::Scheduled => "scheduled",
        }
    }
}

/// Validated configuration for one booking run.
#[derive(Debug, Clone)]
pub struct BookingConfig {
    pub site_url: Url,
    pub email: String,
    pub password: String,
    pub players: u32,
    pub window: TimeWindow,
    pub mode: Mode,
    pub release_time: NaiveTime,
    pub advance_days: u32,
    pub lead: Duration,
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub retry_budget: Duration,
    pub element_timeout: Duration,
}

impl BookingConfig {
    pub fn new(site_url: Url, email: String, password: String) -> Self {
        Self {
            site_url,
            email,
            password,
            players: 4,
            window: TimeWindow::parse("08:00-11:00").expect("literal window"),
            mode: Mode::Scheduled,
            release_time: NaiveTime::from_hms_opt(7, 0, 0).expect("literal time"),
            advance_days: 7,
            lead: Duration::from_secs(10),
            max_attempts: 60,
            retry_delay: Duration::from_secs(1),
            retry_budget: Duration::from_secs(120),
            element_timeout: Duration::from_secs(3),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.email.is_empty() {
            return Err(Error::InvalidConfig("email must not be empty".into()));
        }
        if self.password.is_empty() {
            return Err(Error::InvalidConfig("password must not be empty".into()));
        }
        if !(1..=4).contains(&self.players) {
            return Err(Error::InvalidConfig(format!(
                "players must be 1-4, got {}",
                self.players
            )));
        }
        if self.max_attempts < 1 {
            return Err(Error::InvalidConfig("max_attempts must be at least 1".into()));
        }
        if self.retry_budget.is_zero() {
            return Err(Error::InvalidConfig("retry budget must be positive".into()));
        }
        if self.element_timeout.is_zero() {
            return Err(Error::InvalidConfig("element timeout must be positive".into()));
        }
        Ok(())
    }

    pub fn schedule(&self) -> ReleaseSchedule {
        ReleaseSchedule::new(self.release_time, self.advance_days, self.lead)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, self.retry_delay, self.retry_budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BookingConfig {
        BookingConfig::new(
            Url::parse("https://example.chronogolf.test/widget").unwrap(),
            "golfer@example.com".into(),
            "secret".into(),
        )
    }

    #[test]
    fn test_defaults_validate() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_defaults_match_release_policy() {
        let cfg = config();
        assert_eq!(cfg.release_time, NaiveTime::from_hms_opt(7, 0, 0).unwrap());
        assert_eq!(cfg.advance_days, 7);
        assert_eq!(cfg.lead, Duration::from_secs(10));
        assert_eq!(cfg.max_attempts, 60);
        assert_eq!(cfg.mode, Mode::Scheduled);
    }

    #[test]
    fn test_rejects_empty_credentials() {
        let mut cfg = config();
        cfg.email.clear();
        assert!(cfg.validate().is_err());

        let mut cfg = config();
        cfg.password.clear();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_player_count() {
        let mut cfg = config();
        cfg.players = 0;
        assert!(cfg.validate().is_err());
        cfg.players = 5;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_attempts_and_budget() {
        let mut cfg = config();
        cfg.max_attempts = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = config();
        cfg.retry_budget = Duration::ZERO;
        assert!(cfg.validate().is_err());
    }
}
