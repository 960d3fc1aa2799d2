//! Vimeo API client
//!
//! Each endpoint call refreshes the shared [`Config`] under its lock, builds
//! the request, releases the lock and hands the request to the [`Transport`]
//! worker. The returned [`PendingRequest`] resolves to the decoded list.

use crate::core::models::{Channel, ChannelList, Video, VideoList};
use crate::core::progress::{Next, Progress};
use crate::error::ScopeError;
use crate::platform::accounts::AccountProvider;
use crate::platform::config::{
    refresh_config, ClientOptions, Config, EnvLookup, IGNORE_ACCOUNTS_ENV,
};
use crate::platform::response::{decode_response, get_list};
use crate::platform::transport::{fetch, PendingRequest, Transport};
use crate::utils::url::make_uri;
use reqwest::header::{ACCEPT, ACCEPT_ENCODING, AUTHORIZATION, USER_AGENT};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// Page size of the featured channel listing
const CHANNELS_PER_PAGE: &str = "10";

/// Client for the fixed set of Vimeo endpoints used by the scope
pub struct ApiClient {
    transport: Transport,
    defaults: Config,
    config: Mutex<Config>,
    env: EnvLookup,
    accounts: Arc<dyn AccountProvider>,
    cancelled: Arc<AtomicBool>,
}

impl ApiClient {
    /// Create a client and start its transport worker
    pub fn new(options: ClientOptions, accounts: Arc<dyn AccountProvider>) -> Result<Self, ScopeError> {
        let transport = Transport::start(options.http.clone())?;
        info!("Vimeo API client ready (apiroot: {})", options.defaults.apiroot);
        let env = options.env().clone();

        Ok(Self {
            transport,
            config: Mutex::new(options.defaults.clone()),
            defaults: options.defaults,
            env,
            accounts,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Search videos: `GET /videos?query=<query>`
    pub fn videos(&self, query: &str) -> PendingRequest<VideoList> {
        self.async_get(&["videos"], &[("query", query)], video_list)
    }

    /// Featured channels by follower count: `GET /channels`
    pub fn channels(&self) -> PendingRequest<ChannelList> {
        self.async_get(
            &["channels"],
            &[
                ("sort", "followers"),
                ("filter", "featured"),
                ("per_page", CHANNELS_PER_PAGE),
            ],
            |root| get_list(root, Channel::from_json),
        )
    }

    /// Videos of one channel, or of a pseudo-channel such as `staffpicks`
    pub fn channels_videos(&self, channel: &str) -> PendingRequest<VideoList> {
        self.async_get(&["channels", channel, "videos"], &[], video_list)
    }

    /// The user's personal feed: `GET /me/feed`.
    ///
    /// Only meaningful when [`ApiClient::authenticated`] is true; the client
    /// does not check.
    pub fn feed(&self) -> PendingRequest<VideoList> {
        self.async_get(&["me", "feed"], &[], video_list)
    }

    /// Abort every in-flight request at its next progress checkpoint.
    ///
    /// Cannot be undone: every later request on this client resolves to
    /// [`ScopeError::Cancelled`].
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            info!("API client cancelled");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Refresh the config from the account provider and report whether an
    /// authenticated account was found
    pub fn authenticated(&self) -> bool {
        self.refreshed_config().authenticated
    }

    /// Refresh the config and return a snapshot of it
    pub fn config(&self) -> Config {
        self.refreshed_config().clone()
    }

    /// Whether account lookup is disabled through the environment
    pub fn ignores_accounts(&self) -> bool {
        (self.env)(IGNORE_ACCOUNTS_ENV).is_some()
    }

    /// Stop the transport worker. Pending requests resolve to
    /// [`ScopeError::TransportStopped`]. Also done on drop.
    pub fn shutdown(&self) {
        self.transport.stop();
    }

    fn refreshed_config(&self) -> MutexGuard<'_, Config> {
        let mut config = self.config.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *config = refresh_config(&self.defaults, &self.env, self.accounts.as_ref());
        config
    }

    fn build_request(&self, path: &[&str], params: &[(&str, &str)]) -> Result<reqwest::Request, ScopeError> {
        let config = self.refreshed_config();

        let url = make_uri(&config.apiroot, path, params)?;
        let mut builder = self.transport.http().get(url);

        if let Some(authorization) = config.authorization() {
            builder = builder.header(AUTHORIZATION, authorization);
        }

        let request = builder
            .header(ACCEPT, config.accept.as_str())
            .header(USER_AGENT, config.user_agent_header())
            .header(ACCEPT_ENCODING, "gzip")
            .build()?;

        Ok(request)
    }

    fn async_get<T, F>(&self, path: &[&str], params: &[(&str, &str)], extract: F) -> PendingRequest<T>
    where
        T: Send + 'static,
        F: FnOnce(&Value) -> Result<T, ScopeError> + Send + 'static,
    {
        // The config lock is released here, before any network activity
        let request = match self.build_request(path, params) {
            Ok(request) => request,
            Err(e) => return PendingRequest::failed(e),
        };
        debug!("Submitting request to {}", request.url());

        let http = self.transport.http().clone();
        let cancelled = self.cancelled.clone();

        self.transport.submit(async move {
            let response = fetch(&http, request, |progress| progress_report(&cancelled, progress)).await?;
            decode_response(response, extract)
        })
    }
}

fn video_list(root: &Value) -> Result<VideoList, ScopeError> {
    get_list(root, Video::from_json)
}

fn progress_report(cancelled: &AtomicBool, _progress: &Progress) -> Next {
    if cancelled.load(Ordering::SeqCst) {
        Next::Abort
    } else {
        Next::Continue
    }
}
