use clap::Parser;
use std::sync::Arc;

use desk_backend::config::{AppState, Config, ServeArgs};
use desk_backend::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = ServeArgs::parse();
    let cfg = Config::load(&args)?;
    logger::init(&cfg.logging.level)?;

    // 创建 Tokio 运行时，根据 workers 配置设置线程数
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        tracing::info!("[CONFIG] Using {workers} worker threads");
    } else {
        tracing::info!("[CONFIG] Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;
    let state = Arc::new(AppState::new(&cfg));

    logger::log_server_start(&listener.local_addr()?, &cfg);

    server::start_server_loop(listener, state, server::shutdown_signal()).await?;
    Ok(())
}
