use std::{net::SocketAddr, sync::Arc};

use linkbridge::{
    common::types::AnyResult,
    configs::Config,
    resolver::Resolver,
    server::AppState,
    sources::{SourceManager, applemusic::token::AppleMusicTokenTracker},
    transport,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> AnyResult<()> {
    let config = Config::load()?;
    linkbridge::common::logger::init(config.logging.as_ref());
    linkbridge::log_println!(
        "Linkbridge v{} ({})",
        env!("CARGO_PKG_VERSION"),
        option_env!("GIT_COMMIT").unwrap_or("unknown")
    );

    let timeout = config.http.timeout();
    let apple_tokens = Arc::new(AppleMusicTokenTracker::from_config(
        &config.applemusic,
        timeout,
    )?);

    let source_manager = Arc::new(SourceManager::new(&config, apple_tokens.clone()));
    if source_manager.get(linkbridge::protocol::Platform::Apple).is_some() {
        apple_tokens.init();
    }
    if source_manager.platforms().len() < 2 {
        warn!(
            "Only {:?} enabled; links cannot be converted anywhere",
            source_manager.source_names()
        );
    }

    let resolver = Resolver::from_config(source_manager, &config.applemusic);
    let address: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let shared_state = Arc::new(AppState { resolver, config });
    let app = transport::http_server::router(shared_state)
        .layer(tower_http::trace::TraceLayer::new_for_http());

    info!("Linkbridge listening on {}", address);

    let listener = tokio::net::TcpListener::bind(address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Linkbridge stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down...");
}
