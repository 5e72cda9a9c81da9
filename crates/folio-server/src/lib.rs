//! HTTP server for Folio.
//!
//! Serves the article REST API over the bucket, media uploads, the static
//! markdown publication, and the portfolio document.

pub mod blogs;
pub mod config;
pub mod error;
pub mod files;
pub mod handler;
pub mod publication;
pub mod router;
pub mod server;
pub mod state;

pub use config::{ServerConfig, CONFIG_ENV};
pub use error::{ServerError, ServerResult};
pub use router::build_router;
pub use server::FolioServer;
pub use state::AppState;
