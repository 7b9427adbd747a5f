mod api;
mod blockchain;
mod config;
mod consensus;
mod error;
mod miner;
mod transaction;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::info;

use api::AppState;
use config::NodeConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let cfg = NodeConfig::from_env();
    println!(
        "⛓️ Starting ledger node {} at http://{}:{}",
        cfg.node_address, cfg.host, cfg.port
    );
    info!("config: {:?}", cfg);

    let state = web::Data::new(AppState::new(&cfg).map_err(std::io::Error::other)?);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((cfg.host.as_str(), cfg.port))?
    .run()
    .await
}
