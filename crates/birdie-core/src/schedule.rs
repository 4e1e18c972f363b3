use crate::{Error, Result};
use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::time::Duration;

/// Timezone the booking site publishes release times in.
pub const BOOKING_TZ: Tz = chrono_tz::America::Los_Angeles;

/// Current instant in the booking timezone.
pub fn booking_now() -> DateTime<Tz> {
    Utc::now().with_timezone(&BOOKING_TZ)
}

/// Computes the release instant and the wait leading up to it.
///
/// The site releases tee times for (today + `advance_days`) at a fixed
/// local time each morning. Attempts start `lead` before that instant.
#[derive(Debug, Clone, Copy)]
pub struct ReleaseSchedule {
    release_time: NaiveTime,
    advance_days: u32,
    lead: Duration,
}

impl ReleaseSchedule {
    pub fn new(release_time: NaiveTime, advance_days: u32, lead: Duration) -> Self {
        Self {
            release_time,
            advance_days,
            lead,
        }
    }

    /// The date that becomes bookable at today's release.
    pub fn target_date(&self, now: DateTime<Tz>) -> NaiveDate {
        now.date_naive() + Days::new(u64::from(self.advance_days))
    }

    /// Today's release instant, resolved in the booking timezone.
    ///
    /// A DST-ambiguous wall-clock time resolves to the earlier instant; a
    /// wall-clock time skipped by a DST jump is rejected.
    pub fn release_instant(&self, now: DateTime<Tz>) -> Result<DateTime<Tz>> {
        let local = now.date_naive().and_time(self.release_time);
        BOOKING_TZ
            .from_local_datetime(&local)
            .earliest()
            .ok_or_else(|| {
                Error::InvalidConfig(format!(
                    "release time {} does not exist on {} in {}",
                    self.release_time.format("%H:%M"),
                    now.date_naive(),
                    BOOKING_TZ
                ))
            })
    }

    /// How long to wait before the attempt phase may start.
    ///
    /// Returns zero when `now` is already inside the lead window, and an
    /// error when the release has passed: a late start must abort rather
    /// than book against a stale day.
    pub fn lead_in(&self, now: DateTime<Tz>) -> Result<Duration> {
        let release = self.release_instant(now)?;
        if now > release {
            return Err(Error::ReleasePassed(release.to_rfc3339()));
        }

        let lead = chrono::Duration::from_std(self.lead)
            .map_err(|e| Error::InvalidConfig(format!("lead time out of range: {}", e)))?;

        Ok((release - now - lead).to_std().unwrap_or(Duration::ZERO))
    }
}
