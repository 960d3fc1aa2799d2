//! Video and channel records decoded from API list items

use crate::error::ScopeError;
use serde::Deserialize;
use serde_json::Value;

/// A video as returned by the search, channel and feed endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
    id: String,
    name: String,
    description: String,
    uri: String,
    picture: String,
    username: String,
}

/// A channel as returned by the channel listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    id: String,
    name: String,
}

/// Ordered list of videos, in API response order
pub type VideoList = Vec<Video>;

/// Ordered list of channels, in API response order
pub type ChannelList = Vec<Channel>;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawVideo {
    uri: Option<String>,
    name: Option<String>,
    description: Option<String>,
    link: Option<String>,
    pictures: Option<RawPictures>,
    user: Option<RawUser>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPictures {
    sizes: Vec<RawPictureSize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPictureSize {
    link: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawUser {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawChannel {
    uri: Option<String>,
    name: Option<String>,
}

/// Trailing segment of an API resource path, e.g. `/channels/staffpicks` -> `staffpicks`
fn resource_id(uri: &str) -> String {
    uri.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

impl Video {
    /// Build a video from one item of a `data` array
    pub fn from_json(item: &Value) -> Result<Self, ScopeError> {
        let raw = RawVideo::deserialize(item)?;

        // Sizes are listed smallest first
        let picture = raw
            .pictures
            .and_then(|pictures| pictures.sizes.into_iter().last())
            .and_then(|size| size.link)
            .unwrap_or_default();

        Ok(Self {
            id: resource_id(raw.uri.as_deref().unwrap_or_default()),
            name: raw.name.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            uri: raw.link.unwrap_or_default(),
            picture,
            username: raw.user.and_then(|user| user.name).unwrap_or_default(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Public page of the video
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Largest available thumbnail
    pub fn picture(&self) -> &str {
        &self.picture
    }

    /// Name of the uploader
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl Channel {
    /// Build a channel from one item of a `data` array
    pub fn from_json(item: &Value) -> Result<Self, ScopeError> {
        let raw = RawChannel::deserialize(item)?;
        Ok(Self {
            id: resource_id(raw.uri.as_deref().unwrap_or_default()),
            name: raw.name.unwrap_or_default(),
        })
    }

    /// Identifier usable as a department id and with `channels_videos`
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_video_from_json() {
        let item = json!({
            "uri": "/videos/76979871",
            "name": "The New Vimeo Player",
            "description": "It may look (mostly) the same",
            "link": "https://vimeo.com/76979871",
            "pictures": {
                "sizes": [
                    {"width": 100, "height": 75, "link": "https://i.vimeocdn.com/video/small.jpg"},
                    {"width": 640, "height": 360, "link": "https://i.vimeocdn.com/video/large.jpg"}
                ]
            },
            "user": {"name": "Vimeo Staff"}
        });

        let video = Video::from_json(&item).unwrap();
        assert_eq!(video.id(), "76979871");
        assert_eq!(video.name(), "The New Vimeo Player");
        assert_eq!(video.description(), "It may look (mostly) the same");
        assert_eq!(video.uri(), "https://vimeo.com/76979871");
        assert_eq!(video.picture(), "https://i.vimeocdn.com/video/large.jpg");
        assert_eq!(video.username(), "Vimeo Staff");
    }

    #[test]
    fn test_video_missing_fields() {
        let video = Video::from_json(&json!({"name": "Untitled", "description": null})).unwrap();
        assert_eq!(video.name(), "Untitled");
        assert_eq!(video.id(), "");
        assert_eq!(video.description(), "");
        assert_eq!(video.picture(), "");
        assert_eq!(video.username(), "");
    }

    #[test]
    fn test_null_fields_read_as_empty() {
        let video = Video::from_json(&json!({
            "uri": null,
            "name": null,
            "link": null,
            "pictures": {"sizes": [{"link": null}]},
            "user": {"name": null}
        }))
        .unwrap();
        assert_eq!(video.id(), "");
        assert_eq!(video.name(), "");
        assert_eq!(video.uri(), "");
        assert_eq!(video.picture(), "");
        assert_eq!(video.username(), "");

        let channel = Channel::from_json(&json!({"uri": "/channels/927", "name": null})).unwrap();
        assert_eq!(channel.id(), "927");
        assert_eq!(channel.name(), "");
    }

    #[test]
    fn test_video_wrong_field_type() {
        let result = Video::from_json(&json!({"name": 42}));
        assert!(matches!(result, Err(ScopeError::Parse(_))));
    }

    #[test]
    fn test_channel_from_json() {
        let channel =
            Channel::from_json(&json!({"uri": "/channels/staffpicks", "name": "Staff Picks"}))
                .unwrap();
        assert_eq!(channel.id(), "staffpicks");
        assert_eq!(channel.name(), "Staff Picks");
    }

    #[test]
    fn test_resource_id() {
        assert_eq!(resource_id("/channels/927"), "927");
        assert_eq!(resource_id("/channels/927/"), "927");
        assert_eq!(resource_id("staffpicks"), "staffpicks");
        assert_eq!(resource_id(""), "");
    }
}
