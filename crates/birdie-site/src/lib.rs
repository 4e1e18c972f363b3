pub mod calendar;
pub mod confirm;
pub mod error;
pub mod login;
pub mod players;
pub mod selectors;
pub mod slots;

pub use error::{Error, Result};
