use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Chrome not found: {0}")]
    ChromeNotFound(String),

    #[error("Failed to launch Chrome: {0}")]
    Launch(String),

    #[error("Profile error: {0}")]
    Profile(String),

    #[error("CDP error: {0}")]
    Cdp(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Page not ready: {0}")]
    PageNotReady(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
