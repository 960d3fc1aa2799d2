//! Vimeo API client and its transport

pub mod accounts;
pub mod client;
pub mod config;
pub mod response;
pub mod transport;

pub use accounts::*;
pub use client::*;
pub use config::*;
pub use transport::{PendingRequest, RawResponse, Transport};
