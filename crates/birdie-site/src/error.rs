use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Login failed: {0}")]
    LoginFailed(String),

    #[error("Booking step failed: {0}")]
    Step(String),

    #[error("No tee times released yet")]
    SlotsNotReleased,

    #[error("No tee time inside the preferred window")]
    NoSlotInWindow,

    #[error(transparent)]
    Browser(#[from] birdie_browser::Error),
}

impl Error {
    /// Whether the retry loop may try again after this error.
    ///
    /// Stale or missing UI state is transient; authentication failures and
    /// broken browser plumbing are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Step(_) | Error::SlotsNotReleased | Error::NoSlotInWindow => true,
            Error::Browser(birdie_browser::Error::ElementNotFound(_)) => true,
            Error::Browser(birdie_browser::Error::PageNotReady(_)) => true,
            Error::LoginFailed(_) | Error::Browser(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ui_errors_are_transient() {
        assert!(Error::SlotsNotReleased.is_transient());
        assert!(Error::NoSlotInWindow.is_transient());
        assert!(Error::Step("date button disabled".into()).is_transient());
        assert!(
            Error::Browser(birdie_browser::Error::ElementNotFound("a.rate".into()))
                .is_transient()
        );
        assert!(
            Error::Browser(birdie_browser::Error::PageNotReady("loading".into())).is_transient()
        );
    }

    #[test]
    fn test_auth_and_plumbing_errors_are_fatal() {
        assert!(!Error::LoginFailed("bad password".into()).is_transient());
        assert!(!Error::Browser(birdie_browser::Error::Cdp("gone".into())).is_transient());
        assert!(
            !Error::Browser(birdie_browser::Error::Launch("no chrome".into())).is_transient()
        );
    }
}
