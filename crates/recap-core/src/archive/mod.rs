//! Domain model of the V-ARCHIVE scoring API.
//!
//! - **Enums**: button modes and difficulty boards
//! - **Types**: board and tier responses as returned by the API

mod enums;
mod types;

pub use enums::*;
pub use types::*;
