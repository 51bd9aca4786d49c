use std::net::SocketAddr;

use gatehouse::{config::Config, router, startup};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    startup::init_tracing(&config);

    let addr = format!("{}:{}", config.app.host, config.app.port);
    let environment = config.app.environment;

    let state = match startup::build_state(config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("failed to initialize application: {e}");
            std::process::exit(1);
        }
    };

    let session_layer = startup::session_layer(&state.config);
    let mut app = router::build_router(state, session_layer);

    if environment.is_development() {
        app = app.layer(tower_livereload::LiveReloadLayer::new());
    }

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(%addr, ?environment, "gatehouse listening");

    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    {
        tracing::error!("server error: {e}");
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown signal received");
    }
}
