//! Domain records, the result sink and query evaluation

pub mod models;
pub mod progress;
pub mod query;
pub mod reply;

pub use models::*;
pub use progress::*;
pub use query::*;
pub use reply::*;
