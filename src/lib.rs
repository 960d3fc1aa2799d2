//! # vimeo-scope - Vimeo search and browse connector
//!
//! Queries the Vimeo API and turns the answers into display-ready results,
//! grouped in categories under a department tree.
//!
//! ## Features
//!
//! - Video search, featured channels, channel videos and the personal feed
//! - Credentials from a pluggable account provider, refreshed per request
//! - All network I/O on one background worker, with cooperative cancellation
//! - Gzip-compressed responses
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vimeo_scope::core::{CannedQuery, CollectingReply, Query};
//! use vimeo_scope::platform::{ApiClient, ClientOptions, EnvAccounts};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(ClientOptions::default(), Arc::new(EnvAccounts))?;
//!     let query = Query::new(CannedQuery::new("timelapse", ""), Arc::new(client));
//!
//!     let mut reply = CollectingReply::with_limit(10);
//!     query.run(&mut reply)?;
//!     for result in &reply.results {
//!         println!("{} {}", result.title, result.uri);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod platform;
pub mod utils;

// Re-export main types
pub use core::{CannedQuery, CollectingReply, Query, SearchReply, Video, Channel};
pub use error::ScopeError;
pub use platform::{ApiClient, ClientOptions, PendingRequest};

/// Result type alias for vimeo-scope operations
pub type Result<T> = std::result::Result<T, ScopeError>;
