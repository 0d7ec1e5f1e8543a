//! HTTP response building module
//!
//! JSON bodies for every status the service emits, plus the headers applied
//! to all responses (server name, CORS).

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{self, HeaderValue};
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::config::HttpConfig;
use crate::error::ServiceError;

/// Response type produced by every handler
pub type HttpResponse = Response<Full<Bytes>>;

/// Methods advertised in CORS preflight responses
const CORS_ALLOW_METHODS: &str = "GET, POST, OPTIONS";

/// Body of every non-2xx response
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    detail: &'a str,
}

/// Build JSON response
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    let json = match serde_json::to_vec(body) {
        Ok(j) => j,
        Err(e) => {
            log_build_error("JSON", &e);
            return Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header("Content-Type", "application/json")
                .body(Full::new(Bytes::from_static(
                    br#"{"detail":"Internal server error"}"#,
                )))
                .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Error"))));
        }
    };

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::from("Error")))
        })
}

/// Build the `{"detail": ...}` response for a handler failure
pub fn error_response(err: &ServiceError) -> HttpResponse {
    let detail = err.to_string();
    json_response(err.status(), &ErrorBody { detail: &detail })
}

/// Build 404 Not Found response
pub fn build_404_response() -> HttpResponse {
    json_response(StatusCode::NOT_FOUND, &ErrorBody { detail: "Not Found" })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(allow: &str) -> HttpResponse {
    let mut resp = json_response(
        StatusCode::METHOD_NOT_ALLOWED,
        &ErrorBody {
            detail: "Method Not Allowed",
        },
    );
    if let Ok(value) = HeaderValue::from_str(allow) {
        resp.headers_mut().insert(header::ALLOW, value);
    }
    resp
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> HttpResponse {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Allow", CORS_ALLOW_METHODS);

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Methods", CORS_ALLOW_METHODS)
            .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
            .header("Access-Control-Max-Age", "600");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Add the headers every response carries
pub fn apply_common_headers(mut resp: HttpResponse, http: &HttpConfig) -> HttpResponse {
    let headers = resp.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&http.server_name) {
        headers.insert(header::SERVER, value);
    }
    if http.enable_cors {
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
    }
    resp
}

/// Log response build error
fn log_build_error(status: &str, error: &dyn std::fmt::Display) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(resp: HttpResponse) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn http_config(enable_cors: bool) -> HttpConfig {
        HttpConfig {
            server_name: "desk-backend/test".to_string(),
            enable_cors,
            max_body_size: 1024,
        }
    }

    #[tokio::test]
    async fn test_error_response_shape() {
        let resp = error_response(&ServiceError::InvalidInput("Invalid operation: mod".into()));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "application/json"
        );
        let body = body_json(resp).await;
        assert_eq!(body["detail"], "Invalid operation: mod");
    }

    #[test]
    fn test_405_has_allow_header() {
        let resp = build_405_response("POST");
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers().get("allow").unwrap(), "POST");
    }

    #[test]
    fn test_common_headers() {
        let resp = apply_common_headers(build_404_response(), &http_config(true));
        assert_eq!(resp.headers().get("server").unwrap(), "desk-backend/test");
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );

        let resp = apply_common_headers(build_404_response(), &http_config(false));
        assert!(resp.headers().get("access-control-allow-origin").is_none());
    }

    #[test]
    fn test_options_response() {
        let resp = build_options_response(true);
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(resp.headers().contains_key("access-control-allow-methods"));

        let resp = build_options_response(false);
        assert!(!resp.headers().contains_key("access-control-allow-methods"));
    }
}
