//! URL utilities for building API endpoint addresses

use crate::error::ScopeError;
use url::Url;

/// Build `<apiroot>/<segments...>?<params...>`.
///
/// Segments are percent-encoded individually, so a channel id can never
/// escape its path position. A trailing slash on the API root is ignored.
pub fn make_uri(apiroot: &str, segments: &[&str], params: &[(&str, &str)]) -> Result<Url, ScopeError> {
    let mut url = Url::parse(apiroot)?;

    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| ScopeError::InvalidUrl(format!("API root cannot be a base: {}", apiroot)))?;
        path.pop_if_empty();
        path.extend(segments);
    }

    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_uri_with_query() {
        let url = make_uri("https://api.vimeo.com", &["videos"], &[("query", "cats & dogs")]).unwrap();
        assert_eq!(url.as_str(), "https://api.vimeo.com/videos?query=cats+%26+dogs");
    }

    #[test]
    fn test_make_uri_multiple_segments() {
        let url = make_uri("https://api.vimeo.com/", &["channels", "staffpicks", "videos"], &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.vimeo.com/channels/staffpicks/videos");
    }

    #[test]
    fn test_make_uri_keeps_root_path() {
        let url = make_uri("http://localhost:8080/api/", &["me", "feed"], &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/me/feed");
    }

    #[test]
    fn test_make_uri_encodes_segments() {
        let url = make_uri("https://api.vimeo.com", &["channels", "a/b", "videos"], &[]).unwrap();
        assert_eq!(url.path(), "/channels/a%2Fb/videos");
    }

    #[test]
    fn test_make_uri_parameter_order() {
        let url = make_uri(
            "https://api.vimeo.com",
            &["channels"],
            &[("sort", "followers"), ("filter", "featured"), ("per_page", "10")],
        )
        .unwrap();
        assert_eq!(url.query(), Some("sort=followers&filter=featured&per_page=10"));
    }

    #[test]
    fn test_make_uri_invalid_root() {
        assert!(matches!(make_uri("not a url", &["videos"], &[]), Err(ScopeError::Url(_))));
        assert!(matches!(
            make_uri("mailto:someone@example.com", &["videos"], &[]),
            Err(ScopeError::InvalidUrl(_))
        ));
    }
}
