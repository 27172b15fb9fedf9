//! Archive API access.
//!
//! - **HTTP client**: retrying JSON transport
//! - **API**: board/tier fetchers and the [`ArchiveSource`] seam

mod api;
mod client;
#[cfg(test)]
mod test_server;

pub use api::{ArchiveApi, ArchiveSource};
pub use client::HttpClient;
