mod config;
mod db;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env().expect("invalid server configuration");
    let port = config.port;

    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("database init failed");

    match (&config.email, config.email_code_echo) {
        (Some(_), _) => {}
        (None, true) => tracing::warn!("email delivery not configured; codes are logged and echoed in responses"),
        (None, false) => tracing::warn!("email delivery not configured and EMAIL_CODE_ECHO off; codes cannot reach users"),
    }
    if config.google.is_none() {
        tracing::info!("google sign-in disabled; set GOOGLE_CLIENT_ID, GOOGLE_CLIENT_SECRET and GOOGLE_REDIRECT_URI");
    }

    let state = state::AppState::new(pool, config);

    let app = routes::app(state).expect("failed to build router");
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "bookclub listening");
    axum::serve(listener, app).await.expect("server failed");
}
