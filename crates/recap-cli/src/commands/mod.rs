//! CLI command implementations.

pub mod check;
pub mod run;

/// Shown when the archive does not know the nickname
pub const NICKNAME_NOT_FOUND: &str = "Nickname not found. Please check the nickname again.";

/// Shown for every other failure while building a recap
pub const LOAD_FAILED: &str = "Failed to load records. Please try again later.";
