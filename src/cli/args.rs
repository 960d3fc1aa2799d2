//! Command line argument parsing

use crate::core::query::CannedQuery;
use crate::platform::config::ClientOptions;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Search and browse Vimeo from the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Search text; browse departments when absent or blank
    pub query: Option<String>,

    /// Department to browse (channel id, or `aggregated:<name>`)
    #[arg(short, long, value_name = "ID", default_value = "")]
    pub department: String,

    /// Vimeo API root
    #[arg(long, value_name = "URL")]
    pub apiroot: Option<String>,

    /// JSON file with account service statuses, re-read on every request
    #[arg(long, value_name = "PATH")]
    pub accounts_file: Option<PathBuf>,

    /// HTTP timeout (e.g., 30s, 1m); none by default
    #[arg(long, value_name = "DURATION")]
    pub timeout: Option<humantime::Duration>,

    /// Max results to print (0 means all)
    #[arg(long, default_value = "0")]
    pub limit: usize,

    /// Override User-Agent header
    #[arg(long, value_name = "USER_AGENT")]
    pub user_agent: Option<String>,

    /// Proxy URL (http/https/socks)
    #[arg(long, value_name = "URL")]
    pub proxy: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (only errors)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Get HTTP timeout as Duration
    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout.map(Into::into)
    }

    /// Result limit, `None` meaning unlimited
    pub fn result_limit(&self) -> Option<usize> {
        (self.limit > 0).then_some(self.limit)
    }

    /// Query built from the positional text and the department
    pub fn canned_query(&self) -> CannedQuery {
        CannedQuery::new(self.query.as_deref().unwrap_or_default(), &self.department)
    }

    /// Client options with the command line overrides applied
    pub fn client_options(&self) -> ClientOptions {
        let mut options = ClientOptions::default();

        if let Some(apiroot) = &self.apiroot {
            options = options.with_apiroot(apiroot);
        }
        if let Some(user_agent) = &self.user_agent {
            options = options.with_user_agent(user_agent);
        }
        if let Some(proxy) = &self.proxy {
            options = options.with_proxy(proxy);
        }
        if let Some(timeout) = self.timeout_duration() {
            options = options.with_timeout(timeout);
        }

        options
    }

    /// Get output verbosity level
    pub fn verbosity_level(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbosityLevel {
    /// Quiet (only errors)
    Quiet,
    /// Normal
    Normal,
    /// Verbose (debug info)
    Verbose,
}
