//! Request input helpers
//!
//! Size-limited body collection, JSON decoding and query string lookup.

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::Uri;
use serde::de::DeserializeOwned;

use crate::error::{Result, ServiceError};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Collect a request body, failing with 413 once `max_body_size` is exceeded
pub async fn read_body<B>(body: B, max_body_size: u64) -> Result<Bytes>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => Err(ServiceError::PayloadTooLarge {
            limit: max_body_size,
        }),
        Err(e) => Err(ServiceError::InvalidInput(format!(
            "Failed to read request body: {e}"
        ))),
    }
}

/// Decode a JSON body into the expected request shape
pub fn parse_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes)
        .map_err(|e| ServiceError::Unprocessable(format!("Invalid request body: {e}")))
}

/// Look up a percent-decoded query string parameter
pub fn query_param(uri: &Uri, name: &str) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
