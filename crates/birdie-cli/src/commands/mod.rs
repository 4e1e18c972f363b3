pub mod book;
pub mod check;

use anyhow::{anyhow, Context, Result};
use birdie_core::{BookingConfig, Mode, TimeWindow};
use chrono::NaiveTime;
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Options shared by `book` and `check`. Credentials and site parameters
/// fall back to the environment so a cron entry stays a one-liner.
#[derive(Args, Debug, Clone)]
pub struct BookArgs {
    /// Booking widget URL
    #[arg(long, env = "BOOKING_URL")]
    pub url: Option<String>,

    /// Member account email
    #[arg(long, env = "GOLF_USERNAME")]
    pub email: Option<String>,

    /// Member account password
    #[arg(long, env = "GOLF_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Number of players to book (1-4)
    #[arg(long, env = "NUMBER_OF_PLAYERS", default_value_t = 4)]
    pub players: u32,

    /// Preferred tee-time window (HH:MM-HH:MM)
    #[arg(long, env = "PREFERRED_TIME_RANGE", default_value = "08:00-11:00")]
    pub window: String,

    /// Run the whole flow immediately instead of waiting for the release
    #[arg(long, env = "TEST_MODE")]
    pub test_mode: bool,

    /// Release time of day in the booking timezone (HH:MM)
    #[arg(long, default_value = "07:00")]
    pub release_time: String,

    /// How many days ahead of today the released date sits
    #[arg(long, default_value_t = 7)]
    pub advance_days: u32,

    /// Seconds before the release instant to start attempting
    #[arg(long, default_value_t = 10)]
    pub lead_seconds: u64,

    /// Maximum booking attempts
    #[arg(long, default_value_t = 60)]
    pub max_attempts: u32,

    /// Delay between attempts, in seconds
    #[arg(long, default_value_t = 1)]
    pub retry_delay: u64,

    /// Wall-clock budget for the attempt phase, in seconds
    #[arg(long, default_value_t = 120)]
    pub retry_budget: u64,

    /// Per-element wait timeout, in seconds
    #[arg(long, default_value_t = 3)]
    pub wait_timeout: u64,

    /// Chrome/Chromium binary override
    #[arg(long)]
    pub chrome_path: Option<PathBuf>,

    /// Named persistent Chrome profile (a throwaway profile when omitted)
    #[arg(long)]
    pub profile: Option<String>,

    /// Run Chrome with a visible window
    #[arg(long)]
    pub headed: bool,

    /// Base directory for run artifacts
    #[arg(long, default_value = "birdie_output")]
    pub output_dir: PathBuf,
}

impl BookArgs {
    pub fn release_time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(&self.release_time, "%H:%M")
            .with_context(|| format!("invalid release time '{}'", self.release_time))
    }

    /// Build the validated run configuration. Missing credentials or URL are
    /// a hard error here: the run aborts before a browser ever starts.
    pub fn to_config(&self) -> Result<BookingConfig> {
        let url = self
            .url
            .as_deref()
            .ok_or_else(|| anyhow!("missing booking URL (--url or BOOKING_URL)"))?;
        let email = self
            .email
            .as_deref()
            .ok_or_else(|| anyhow!("missing account email (--email or GOLF_USERNAME)"))?;
        let password = self
            .password
            .as_deref()
            .ok_or_else(|| anyhow!("missing account password (--password or GOLF_PASSWORD)"))?;

        let site_url = Url::parse(url).with_context(|| format!("invalid booking URL '{}'", url))?;

        let mut config = BookingConfig::new(site_url, email.to_string(), password.to_string());
        config.players = self.players;
        config.window = TimeWindow::parse(&self.window)?;
        config.mode = if self.test_mode {
            Mode::Test
        } else {
            Mode::Scheduled
        };
        config.release_time = self.release_time()?;
        config.advance_days = self.advance_days;
        config.lead = Duration::from_secs(self.lead_seconds);
        config.max_attempts = self.max_attempts;
        config.retry_delay = Duration::from_secs(self.retry_delay);
        config.retry_budget = Duration::from_secs(self.retry_budget);
        config.element_timeout = Duration::from_secs(self.wait_timeout);

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> BookArgs {
        BookArgs {
            url: Some("https://example.chronogolf.test/widget".into()),
            email: Some("golfer@example.com".into()),
            password: Some("secret".into()),
            players: 4,
            window: "08:00-11:00".into(),
            test_mode: false,
            release_time: "07:00".into(),
            advance_days: 7,
            lead_seconds: 10,
            max_attempts: 60,
            retry_delay: 1,
            retry_budget: 120,
            wait_timeout: 3,
            chrome_path: None,
            profile: None,
            headed: false,
            output_dir: PathBuf::from("birdie_output"),
        }
    }

    #[test]
    fn test_to_config_with_full_args() {
        let config = args().to_config().unwrap();
        assert_eq!(config.players, 4);
        assert_eq!(config.mode, Mode::Scheduled);
        assert_eq!(config.max_attempts, 60);
        assert_eq!(config.retry_budget, Duration::from_secs(120));
    }

    #[test]
    fn test_to_config_requires_url_and_credentials() {
        let mut missing_url = args();
        missing_url.url = None;
        assert!(missing_url.to_config().is_err());

        let mut missing_email = args();
        missing_email.email = None;
        assert!(missing_email.to_config().is_err());

        let mut missing_password = args();
        missing_password.password = None;
        assert!(missing_password.to_config().is_err());
    }

    #[test]
    fn test_to_config_rejects_bad_window() {
        let mut bad = args();
        bad.window = "11:00-08:00".into();
        assert!(bad.to_config().is_err());
    }

    #[test]
    fn test_to_config_rejects_bad_release_time() {
        let mut bad = args();
        bad.release_time = "7am".into();
        assert!(bad.to_config().is_err());
    }

    #[test]
    fn test_test_mode_flag_selects_test_mode() {
        let mut test_args = args();
        test_args.test_mode = true;
        assert_eq!(test_args.to_config().unwrap().mode, Mode::Test);
    }
}
