use pricewatch_server::{api::app_router, build_state, config::Config, init_tracing, scheduler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing();
    let state = build_state(&config).await?;

    scheduler::start_price_watcher(&state)?;

    let router = app_router(state.clone(), &config);
    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(scheduler::shutdown_signal())
        .await?;

    // Let the in-flight tick finish before the process exits
    state.watcher.stop().await;
    tracing::info!("Shutdown complete");
    Ok(())
}
