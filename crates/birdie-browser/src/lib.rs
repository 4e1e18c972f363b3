mod chrome;
mod error;
mod locator;
mod profile;
mod session;

pub use chrome::{find_chrome, ChromeProcess, LaunchOptions};
pub use error::{Error, Result};
pub use locator::{eval_bool, eval_string, eval_unit, is_disabled, Locator, Selector, WaitFor};
pub use profile::Profile;
pub use session::Session;

// Re-exported so downstream crates drive elements without a direct
// chromiumoxide dependency.
pub use chromiumoxide::element::Element;
pub use chromiumoxide::Page;
