use dashboard::AppState;
use dotenv::dotenv;
use log::info;
use std::net::TcpListener;
use stockboard::config::Config;
use stockboard::logger;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    logger::init_tracing();

    let config = Config::from_env()?;

    let state = AppState::from_config(&config)?;

    let listener = TcpListener::bind(("0.0.0.0", config.server_port))?;

    info!("dashboard listening on port {}", config.server_port);

    dashboard::run(listener, state)?.await?;

    Ok(())
}
