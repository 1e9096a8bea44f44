//! Common types for the drivefs crates

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
