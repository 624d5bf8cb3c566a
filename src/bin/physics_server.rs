//! Ball physics endpoint for the remote 2D court
//!
//! Configuration comes from `config/server.toml`, `config/local.toml` and
//! `HOOP_*` environment variables (for example `HOOP_BIND=0.0.0.0:8080`).

use hoop_arcade::config::ServerConfig;
use hoop_arcade::server;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server::serve(&config) {
        log::error!("Physics server stopped: {}", e);
        std::process::exit(1);
    }
}
