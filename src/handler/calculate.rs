//! Arithmetic endpoint
//!
//! `POST /calculate` with `{a, b, operation}`; the operation string is parsed
//! into [`Operation`] before any arithmetic happens.

use hyper::body::Body;
use hyper::Request;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::AppState;
use crate::error::{Result, ServiceError};
use crate::http::{self, BoxError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub const ALL: [Self; 4] = [Self::Add, Self::Subtract, Self::Multiply, Self::Divide];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
        }
    }

    /// Apply the operation with plain IEEE-754 semantics
    ///
    /// Division by zero (either sign) is rejected instead of yielding an infinity.
    pub fn apply(self, a: f64, b: f64) -> Result<f64> {
        match self {
            Self::Add => Ok(a + b),
            Self::Subtract => Ok(a - b),
            Self::Multiply => Ok(a * b),
            Self::Divide if b == 0.0 => Err(ServiceError::InvalidInput(
                "Division by zero is not allowed".to_string(),
            )),
            Self::Divide => Ok(a / b),
        }
    }
}

impl FromStr for Operation {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| ServiceError::InvalidInput(format!("Invalid operation: {s}")))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CalculateRequest {
    pub a: f64,
    pub b: f64,
    pub operation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct CalculateResponse {
    pub result: f64,
}

pub fn calculate(request: &CalculateRequest) -> Result<CalculateResponse> {
    let operation: Operation = request.operation.parse()?;
    let result = operation.apply(request.a, request.b)?;
    // JSON has no representation for infinities or NaN
    if !result.is_finite() {
        return Err(ServiceError::Internal(format!(
            "Result of {operation} is out of range: {result}"
        )));
    }
    Ok(CalculateResponse { result })
}

pub async fn handle<B>(req: Request<B>, state: &AppState) -> Result<CalculateResponse>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let body = http::read_body(req.into_body(), state.config.http.max_body_size).await?;
    let request: CalculateRequest = http::parse_json(&body)?;
    calculate(&request)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(a: f64, b: f64, operation: &str) -> CalculateRequest {
        CalculateRequest {
            a,
            b,
            operation: operation.to_string(),
        }
    }

    #[test]
    fn test_parse_operation() {
        for op in Operation::ALL {
            assert_eq!(op.as_str().parse::<Operation>().unwrap(), op);
        }
        assert!("mod".parse::<Operation>().is_err());
        // Names are case sensitive
        assert!("Add".parse::<Operation>().is_err());
    }

    #[test]
    fn test_arithmetic_matches_ieee() {
        let pairs = [(10.0, 4.0), (-3.5, 0.25), (1e300, 10.0), (0.1, 0.2)];
        for (a, b) in pairs {
            assert_eq!(calculate(&request(a, b, "add")).unwrap().result, a + b);
            assert_eq!(calculate(&request(a, b, "subtract")).unwrap().result, a - b);
            assert_eq!(calculate(&request(a, b, "multiply")).unwrap().result, a * b);
            assert_eq!(calculate(&request(a, b, "divide")).unwrap().result, a / b);
        }
    }

    #[test]
    fn test_divide_example() {
        let resp = calculate(&request(10.0, 4.0, "divide")).unwrap();
        assert_eq!(resp, CalculateResponse { result: 2.5 });
    }

    #[test]
    fn test_divide_by_zero_is_input_error() {
        for a in [5.0, 0.0, -1.0, f64::INFINITY] {
            for zero in [0.0, -0.0] {
                let err = calculate(&request(a, zero, "divide")).unwrap_err();
                assert!(matches!(err, ServiceError::InvalidInput(_)));
            }
        }
    }

    #[test]
    fn test_overflow_is_internal_error() {
        let cases = [
            (f64::MAX, f64::MAX, "add"),
            (-f64::MAX, f64::MAX, "subtract"),
            (1e308, 10.0, "multiply"),
            (1e308, 1e-10, "divide"),
        ];
        for (a, b, op) in cases {
            let err = calculate(&request(a, b, op)).unwrap_err();
            assert!(matches!(err, ServiceError::Internal(_)), "{op}");
            assert!(err.status().is_server_error());
        }
    }

    #[test]
    fn test_unknown_operation_is_input_error() {
        let err = calculate(&request(1.0, 2.0, "mod")).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(ref m) if m == "Invalid operation: mod"));
    }

    #[test]
    fn test_integer_operands_accepted() {
        let req: CalculateRequest =
            serde_json::from_str(r#"{"a": 5, "b": 3, "operation": "multiply"}"#).unwrap();
        assert_eq!(calculate(&req).unwrap().result, 15.0);
    }
}
