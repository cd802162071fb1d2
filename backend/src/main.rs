//! Backend entry-point: wires REST endpoints and OpenAPI docs.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use conclave_backend::inbound::http::health::HealthState;
use conclave_backend::server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load configuration: {e}")))?;

    let key_path = settings.session_key_file();
    let key = match std::fs::read(&key_path) {
        Ok(bytes) => Key::derive_from(&bytes),
        Err(e) => {
            if cfg!(debug_assertions) || settings.session_allow_ephemeral {
                warn!(
                    path = %key_path.display(),
                    error = %e,
                    "using temporary session key (dev only)"
                );
                Key::generate()
            } else {
                return Err(std::io::Error::other(format!(
                    "failed to read session key at {}: {e}",
                    key_path.display()
                )));
            }
        }
    };

    let bind_addr: SocketAddr = settings.bind_addr().parse().map_err(|e| {
        std::io::Error::other(format!(
            "invalid bind address {}: {e}",
            settings.bind_addr()
        ))
    })?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state,
        ServerConfig::new(key, settings.cookie_secure, SameSite::Lax, bind_addr),
    )?;
    server.await
}
