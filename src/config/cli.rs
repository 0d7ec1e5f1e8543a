// Command line arguments for the backend binary

use clap::Parser;

/// Default config file, looked up without extension
pub const DEFAULT_CONFIG_PATH: &str = "config";

#[derive(Debug, Clone, Parser)]
#[command(name = "backend")]
#[command(about = "Local JSON backend for the desktop shell")]
pub struct ServeArgs {
    /// Port to listen on (overrides server.port)
    #[arg(long)]
    pub port: Option<u16>,

    /// Address to bind (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Config file path, extension optional
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,
}
