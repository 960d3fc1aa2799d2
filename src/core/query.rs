//! Query evaluation: pick the endpoints for one query and fill the reply

use crate::core::models::VideoList;
use crate::core::reply::{Department, SearchReply, SearchResult};
use crate::error::ScopeError;
use crate::platform::ApiClient;
use std::sync::Arc;
use tracing::{debug, info};

/// Department id prefix used by aggregating front-ends
pub const AGGREGATED_PREFIX: &str = "aggregated:";
/// Pseudo-channel used as the fallback video source
pub const STAFFPICKS: &str = "staffpicks";

const ROOT_DEPARTMENT_TITLE: &str = "My Feed";
/// Category holding the video results
pub const RESULTS_CATEGORY: &str = "vimeo";
const LOGIN_NAG_CATEGORY: &str = "vimeo_login_nag";
const LOGIN_NAG_TITLE: &str = "Log-in to Vimeo";

/// User input for one query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CannedQuery {
    pub query_string: String,
    pub department_id: String,
}

impl CannedQuery {
    pub fn new(query_string: &str, department_id: &str) -> Self {
        Self {
            query_string: query_string.to_string(),
            department_id: department_id.to_string(),
        }
    }
}

/// Where browse mode takes its videos from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    /// Staff picks, requested through an `aggregated:` department
    Aggregated,
    Channel(String),
    Feed,
    StaffPicks,
}

impl VideoSource {
    /// Pick the video source for browse mode
    pub fn select(department_id: &str, authenticated: bool) -> Self {
        if department_id.starts_with(AGGREGATED_PREFIX) {
            VideoSource::Aggregated
        } else if !department_id.is_empty() {
            VideoSource::Channel(department_id.to_string())
        } else if authenticated {
            VideoSource::Feed
        } else {
            VideoSource::StaffPicks
        }
    }
}

/// One query evaluation against the Vimeo API
pub struct Query {
    query: CannedQuery,
    client: Arc<ApiClient>,
}

impl Query {
    pub fn new(query: CannedQuery, client: Arc<ApiClient>) -> Self {
        Self { query, client }
    }

    pub fn canned_query(&self) -> &CannedQuery {
        &self.query
    }

    /// Abort the query's requests. May be called from any thread.
    pub fn cancelled(&self) {
        self.client.cancel();
    }

    /// Evaluate the query into `reply`.
    ///
    /// On error, whatever was registered before the failing request stays in
    /// the reply.
    pub fn run(&self, reply: &mut dyn SearchReply) -> Result<(), ScopeError> {
        let query_string = self.query.query_string.trim();

        let videos = if query_string.is_empty() {
            self.browse(reply)?
        } else {
            info!("Searching videos for {:?}", query_string);
            self.client.videos(query_string).wait()?
        };

        let category = reply.register_category(RESULTS_CATEGORY, "");
        for video in &videos {
            let result = SearchResult {
                category: category.id.clone(),
                uri: video.uri().to_string(),
                title: video.name().to_string(),
                art: video.picture().to_string(),
                description: video.description().to_string(),
                username: video.username().to_string(),
            };

            if !reply.push(result) {
                debug!("Reply accepts no further results");
                break;
            }
        }

        Ok(())
    }

    fn browse(&self, reply: &mut dyn SearchReply) -> Result<VideoList, ScopeError> {
        let department_id = self.query.department_id.as_str();
        let authenticated = self.client.authenticated();
        let source = VideoSource::select(department_id, authenticated);
        info!("Browsing department {:?} from {:?}", department_id, source);

        // Both requests are in flight at once
        let channels = self.client.channels();
        let videos = match &source {
            VideoSource::Aggregated | VideoSource::StaffPicks => self.client.channels_videos(STAFFPICKS),
            VideoSource::Channel(channel) => self.client.channels_videos(channel),
            VideoSource::Feed => self.client.feed(),
        };

        let mut root = Department::new("", ROOT_DEPARTMENT_TITLE);
        for channel in channels.wait()? {
            root.add_subdepartment(Department::new(channel.id(), channel.name()));
        }

        let mut include_login_nag = !authenticated;
        if source == VideoSource::Aggregated {
            // The selected department must exist in the tree
            root.add_subdepartment(Department::new(department_id, " "));
            include_login_nag = false;
        }

        let videos = videos.wait()?;

        reply.register_departments(root);
        if include_login_nag {
            self.add_login_nag(reply);
        }

        Ok(videos)
    }

    fn add_login_nag(&self, reply: &mut dyn SearchReply) {
        if self.client.ignores_accounts() {
            return;
        }

        let category = reply.register_category(LOGIN_NAG_CATEGORY, "");
        reply.push(SearchResult {
            category: category.id,
            title: LOGIN_NAG_TITLE.to_string(),
            ..SearchResult::default()
        });
    }
}
