//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, route matching,
//! dispatch, and mapping handler errors onto status codes.

use crate::config::AppState;
use crate::error::{Result, ServiceError};
use crate::handler::{calculate, files, system};
use crate::http::{self, BoxError, HttpResponse};
use crate::logger::{self, AccessLogEntry};
use hyper::body::Body;
use hyper::{Method, Request, StatusCode};
use serde::Serialize;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Every endpoint the backend serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Root,
    Health,
    Calculate,
    SystemInfo,
    FileContent,
}

impl Endpoint {
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/" => Some(Self::Root),
            "/api/health" => Some(Self::Health),
            "/calculate" => Some(Self::Calculate),
            "/system-info" => Some(Self::SystemInfo),
            "/file-content" => Some(Self::FileContent),
            _ => None,
        }
    }

    pub fn method(self) -> Method {
        match self {
            Self::Root | Self::Health | Self::SystemInfo => Method::GET,
            Self::Calculate | Self::FileContent => Method::POST,
        }
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> std::result::Result<HttpResponse, Infallible>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let started = Instant::now();
    let access_entry = state
        .access_log_enabled()
        .then(|| new_access_entry(&req, &peer_addr));

    let response = route_request(req, &state).await;
    let response = http::apply_common_headers(response, &state.config.http);

    if let Some(mut entry) = access_entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on method and path
async fn route_request<B>(req: Request<B>, state: &AppState) -> HttpResponse
where
    B: Body,
    B::Error: Into<BoxError>,
{
    if req.method() == Method::OPTIONS {
        return http::build_options_response(state.config.http.enable_cors);
    }

    let Some(endpoint) = Endpoint::from_path(req.uri().path()) else {
        return http::build_404_response();
    };

    let allowed = endpoint.method();
    if *req.method() != allowed {
        logger::log_warning(&format!(
            "Method not allowed: {} {}",
            req.method(),
            req.uri().path()
        ));
        return http::build_405_response(allowed.as_str());
    }

    if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        return resp;
    }

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    dispatch(endpoint, req, state).await.unwrap_or_else(|err| {
        logger::log_request_failure(
            method.as_str(),
            &path,
            err.status().as_u16(),
            &err.to_string(),
        );
        http::error_response(&err)
    })
}

async fn dispatch<B>(endpoint: Endpoint, req: Request<B>, state: &AppState) -> Result<HttpResponse>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    match endpoint {
        Endpoint::Root => Ok(ok(&system::welcome())),
        Endpoint::Health => Ok(ok(&system::health())),
        Endpoint::Calculate => calculate::handle(req, state).await.map(|r| ok(&r)),
        Endpoint::SystemInfo => system::system_info().map(|r| ok(&r)),
        Endpoint::FileContent => files::handle(req, state).await.map(|r| ok(&r)),
    }
}

fn ok<T: Serialize>(body: &T) -> HttpResponse {
    http::json_response(StatusCode::OK, body)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<HttpResponse> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::error_response(&ServiceError::PayloadTooLarge {
                    limit: max_body_size,
                }))
            }
            // Malformed values are left to the body reader's limit
            _ => None,
        },
    )
}

fn new_access_entry<B>(req: &Request<B>, peer_addr: &SocketAddr) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(peer_addr, req.method().as_str(), req.uri().path());
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = format!("{:?}", req.version())
        .trim_start_matches("HTTP/")
        .to_string();
    entry.user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    entry
}
