// Configuration module entry point
// Loads layered configuration (defaults, config file, environment, CLI flags)

mod cli;
mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use cli::{ServeArgs, DEFAULT_CONFIG_PATH};
pub use state::AppState;
pub use types::{
    Config, FilesConfig, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig,
};

/// Environment variable prefix, e.g. `BACKEND_SERVER__PORT=9000`
const ENV_PREFIX: &str = "BACKEND";

impl Config {
    /// Load configuration honoring the command line overrides
    pub fn load(args: &ServeArgs) -> Result<Self, config::ConfigError> {
        Self::build(&args.config, args.host.clone(), args.port)
    }

    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::build(config_path, None, None)
    }

    fn build(
        config_path: &str,
        host: Option<String>,
        port: Option<u16>,
    ) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", concat!("desk-backend/", env!("CARGO_PKG_VERSION")))?
            .set_default("http.enable_cors", true)?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_override_option("server.host", host)?
            .set_override_option("server.port", port.map(u64::from))?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
