//! Static and environment-derived endpoints: `/`, `/api/health`, `/system-info`

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::Result;

const WELCOME_MESSAGE: &str = "Welcome to Electron Python App Backend!";
const API_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    /// Local date the check was answered, `YYYY-MM-DD`
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Name and version of the running backend build
    pub runtime_version: String,
    /// Platform identifier, e.g. `linux`, `macos`, `windows`
    pub platform: String,
    /// OS family, `unix` or `windows`
    pub os: String,
    pub arch: String,
    pub cwd: String,
}

pub fn welcome() -> WelcomeResponse {
    WelcomeResponse {
        message: WELCOME_MESSAGE.to_string(),
        version: API_VERSION.to_string(),
    }
}

pub fn health() -> HealthResponse {
    HealthResponse {
        status: "healthy".to_string(),
        message: "Backend service is running normally".to_string(),
        timestamp: Local::now().format("%Y-%m-%d").to_string(),
    }
}

/// Read runtime descriptors from the process at call time
pub fn system_info() -> Result<SystemInfo> {
    let cwd = std::env::current_dir()?;
    Ok(SystemInfo {
        runtime_version: format!(
            "{} {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        ),
        platform: std::env::consts::OS.to_string(),
        os: std::env::consts::FAMILY.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cwd: cwd.display().to_string(),
    })
}
