//! Response decoding: gunzip, JSON parse, status check, extraction

use crate::error::ScopeError;
use crate::platform::transport::RawResponse;
use flate2::read::GzDecoder;
use reqwest::StatusCode;
use serde_json::Value;
use std::io::Read;

/// Turn a raw response into a domain value.
///
/// A non-empty body is always gunzipped. An empty body parses as JSON `null`,
/// a malformed one is a [`ScopeError::Parse`]. Any status other than 200 is
/// an [`ScopeError::Api`] carrying the body's `error` message.
pub fn decode_response<T, F>(response: RawResponse, extract: F) -> Result<T, ScopeError>
where
    F: FnOnce(&Value) -> Result<T, ScopeError>,
{
    let body = if response.body.is_empty() {
        Vec::new()
    } else {
        gunzip(&response.body)?
    };

    let root = parse_body(&body);

    if response.status != StatusCode::OK {
        let message = root
            .as_ref()
            .ok()
            .and_then(|root| root.get("error"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return Err(ScopeError::Api {
            status: response.status.as_u16(),
            message,
        });
    }

    extract(&root?)
}

/// Build one `T` per element of the `data` array, in order.
/// A missing `data` member gives an empty list.
pub fn get_list<T, F>(root: &Value, build: F) -> Result<Vec<T>, ScopeError>
where
    F: Fn(&Value) -> Result<T, ScopeError>,
{
    match root.get("data").and_then(Value::as_array) {
        Some(items) => items.iter().map(build).collect(),
        None => Ok(Vec::new()),
    }
}

fn gunzip(body: &[u8]) -> Result<Vec<u8>, ScopeError> {
    let mut decompressed = Vec::new();
    GzDecoder::new(body)
        .read_to_end(&mut decompressed)
        .map_err(ScopeError::Decompression)?;
    Ok(decompressed)
}

fn parse_body(body: &[u8]) -> Result<Value, ScopeError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
pub(crate) fn gzip(data: &[u8]) -> Vec<u8> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Channel, Video};

    fn response(status: u16, body: Vec<u8>) -> RawResponse {
        RawResponse {
            status: StatusCode::from_u16(status).unwrap(),
            body,
        }
    }

    fn channels(root: &Value) -> Result<Vec<Channel>, ScopeError> {
        get_list(root, Channel::from_json)
    }

    #[test]
    fn test_decode_list_preserves_order() {
        let body = gzip(
            br#"{"data": [
                {"uri": "/channels/b", "name": "B"},
                {"uri": "/channels/a", "name": "A"},
                {"uri": "/channels/b", "name": "B"}
            ]}"#,
        );

        let list = decode_response(response(200, body), channels).unwrap();
        let ids: Vec<&str> = list.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["b", "a", "b"]);
    }

    #[test]
    fn test_empty_body_is_empty_document() {
        let list = decode_response(response(200, Vec::new()), channels).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_missing_data_is_empty_list() {
        let list = decode_response(response(200, gzip(br#"{"total": 0}"#)), |root| {
            get_list(root, Video::from_json)
        })
        .unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_null_fields_do_not_fail_the_list() {
        let body = gzip(
            br#"{"data": [
                {"uri": "/videos/1", "name": "ok", "user": {"name": "alice"}},
                {"uri": "/videos/2", "name": null, "link": null, "user": {"name": null}}
            ]}"#,
        );

        let list = decode_response(response(200, body), |root| get_list(root, Video::from_json)).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name(), "ok");
        assert_eq!(list[1].id(), "2");
        assert_eq!(list[1].name(), "");
        assert_eq!(list[1].username(), "");

        let body = gzip(br#"{"data": [{"uri": "/channels/927", "name": null}]}"#);
        let channels = decode_response(response(200, body), channels).unwrap();
        assert_eq!(channels[0].name(), "");
    }

    #[test]
    fn test_api_error_message() {
        let result = decode_response(response(400, gzip(br#"{"error":"bad"}"#)), channels);
        match result {
            Err(ScopeError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "bad");
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[test]
    fn test_api_error_without_message() {
        let result = decode_response(response(500, Vec::new()), channels);
        assert!(matches!(result, Err(ScopeError::Api { status: 500, ref message }) if message.is_empty()));

        let result = decode_response(response(404, gzip(b"<html>")), channels);
        assert!(matches!(result, Err(ScopeError::Api { status: 404, ref message }) if message.is_empty()));
    }

    #[test]
    fn test_non_ok_success_status_is_api_error() {
        let result = decode_response(response(201, gzip(br#"{"data": []}"#)), channels);
        assert!(matches!(result, Err(ScopeError::Api { status: 201, .. })));
    }

    #[test]
    fn test_decompression_failure() {
        let result = decode_response(response(200, b"{\"data\": []}".to_vec()), channels);
        assert!(matches!(result, Err(ScopeError::Decompression(_))));
    }

    #[test]
    fn test_malformed_json() {
        let result = decode_response(response(200, gzip(b"{\"data\": [")), channels);
        assert!(matches!(result, Err(ScopeError::Parse(_))));
    }

    #[test]
    fn test_extraction_not_run_on_error() {
        let result: Result<(), _> = decode_response(response(403, Vec::new()), |_| {
            panic!("extraction must not run for failed requests")
        });
        assert!(result.unwrap_err().is_api_error());
    }
}
