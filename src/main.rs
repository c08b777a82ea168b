mod config;
mod db;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "no .env file loaded");
    }

    let config = config::ServiceConfig::from_env();
    let state = match db::init_pool(&config) {
        Ok(pool) => state::AppState::new(pool),
        Err(e) => {
            tracing::warn!(error = %e, "database not available, serving empty table lists");
            state::AppState::without_db(e.to_string())
        }
    };

    let app = routes::app(state, config.static_dir.as_deref());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, "tryara-tables listening");
    axum::serve(listener, app).await.expect("server failed");
}
