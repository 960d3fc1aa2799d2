//! API client configuration and credential refresh

use crate::platform::accounts::AccountProvider;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default Vimeo API root
pub const DEFAULT_APIROOT: &str = "https://api.vimeo.com";
/// Default Accept header, pinning the API version
pub const DEFAULT_ACCEPT: &str = "application/vnd.vimeo.*+json; version=3.2";
/// Default User-Agent header
pub const DEFAULT_USER_AGENT: &str = concat!("vimeo-scope/", env!("CARGO_PKG_VERSION"));

/// Overrides the API root when set
pub const APIROOT_ENV: &str = "VIMEO_SCOPE_APIROOT";
/// Disables account lookup entirely when set, to any value
pub const IGNORE_ACCOUNTS_ENV: &str = "VIMEO_SCOPE_IGNORE_ACCOUNTS";

/// Environment variable lookup, injectable for tests
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Read a variable from the process environment. Set-but-empty counts as set.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var_os(name).map(|value| value.to_string_lossy().into_owned())
}

/// Effective configuration used to build one request
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub apiroot: String,
    pub access_token: String,
    pub client_id: String,
    pub client_secret: String,
    pub accept: String,
    pub user_agent: String,
    pub authenticated: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            apiroot: DEFAULT_APIROOT.to_string(),
            access_token: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            accept: DEFAULT_ACCEPT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            authenticated: false,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &str| if value.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("Config")
            .field("apiroot", &self.apiroot)
            .field("access_token", &redact(&self.access_token))
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("accept", &self.accept)
            .field("user_agent", &self.user_agent)
            .field("authenticated", &self.authenticated)
            .finish()
    }
}

impl Config {
    /// Authorization header value, if any credentials are present.
    ///
    /// A bearer token wins over application credentials; application
    /// credentials need both the id and the secret.
    pub fn authorization(&self) -> Option<String> {
        if !self.access_token.is_empty() {
            Some(format!("bearer {}", self.access_token))
        } else if !self.client_id.is_empty() && !self.client_secret.is_empty() {
            let credentials = format!("{}:{}", self.client_id, self.client_secret);
            Some(format!("basic {}", STANDARD.encode(credentials)))
        } else {
            None
        }
    }

    /// User-Agent header value, advertising compressed-response support
    pub fn user_agent_header(&self) -> String {
        format!("{} (gzip)", self.user_agent)
    }
}

/// Rebuild the effective config from `defaults`.
///
/// Nothing carries over from an earlier refresh: credentials are either taken
/// from the first authenticated account or cleared.
pub fn refresh_config(defaults: &Config, env: &EnvLookup, accounts: &dyn AccountProvider) -> Config {
    let mut config = defaults.clone();

    if let Some(apiroot) = env(APIROOT_ENV) {
        config.apiroot = apiroot;
    }

    if env(IGNORE_ACCOUNTS_ENV).is_some() {
        debug!("Ignoring accounts, using default credentials");
        return config;
    }

    match accounts.service_statuses().into_iter().find(|status| status.authenticated) {
        Some(status) => {
            config.authenticated = true;
            config.access_token = status.access_token;
            config.client_id = status.client_id;
            config.client_secret = status.client_secret;
            debug!("Vimeo scope is authenticated");
        }
        None => {
            config.authenticated = false;
            config.access_token.clear();
            config.client_id.clear();
            config.client_secret.clear();
            debug!("Vimeo scope is unauthenticated");
        }
    }

    config
}

/// HTTP transport configuration
#[derive(Debug, Clone, Default)]
pub struct HttpClientConfig {
    /// Request timeout, none by default
    pub timeout: Option<Duration>,
    /// Proxy URL
    pub proxy_url: Option<String>,
}

/// Options for constructing an [`crate::platform::ApiClient`]
#[derive(Clone)]
pub struct ClientOptions {
    /// Config every refresh starts from
    pub defaults: Config,
    /// Transport settings
    pub http: HttpClientConfig,
    env: EnvLookup,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            defaults: Config::default(),
            http: HttpClientConfig::default(),
            env: Arc::new(process_env),
        }
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("defaults", &self.defaults)
            .field("http", &self.http)
            .finish_non_exhaustive()
    }
}

impl ClientOptions {
    /// Set the API root
    pub fn with_apiroot(mut self, apiroot: &str) -> Self {
        self.defaults.apiroot = apiroot.to_string();
        self
    }

    /// Set the Accept header
    pub fn with_accept(mut self, accept: &str) -> Self {
        self.defaults.accept = accept.to_string();
        self
    }

    /// Set the User-Agent, without the gzip marker
    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.defaults.user_agent = user_agent.to_string();
        self
    }

    /// Application credentials used while accounts are ignored
    pub fn with_client_credentials(mut self, client_id: &str, client_secret: &str) -> Self {
        self.defaults.client_id = client_id.to_string();
        self.defaults.client_secret = client_secret.to_string();
        self
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http.timeout = Some(timeout);
        self
    }

    /// Route requests through a proxy
    pub fn with_proxy(mut self, proxy_url: &str) -> Self {
        self.http.proxy_url = Some(proxy_url.to_string());
        self
    }

    /// Replace the environment lookup
    pub fn with_env(mut self, env: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        self.env = Arc::new(env);
        self
    }

    pub fn env(&self) -> &EnvLookup {
        &self.env
    }
}
