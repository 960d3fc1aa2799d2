//! Command line front-end

pub mod args;
pub mod output;

pub use args::{Args, VerbosityLevel};
pub use output::OutputFormatter;
