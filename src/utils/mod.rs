//! Utility functions for vimeo-scope

pub mod url;

pub use url::*;
