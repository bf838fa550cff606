use std::{io, path::Path, sync::Arc};

use actix_web::{App, HttpServer};
use dibs_gateway::{Dibs, DibsSettings};
use dibs_router::{routes, storage::InMemoryOrderStore, AppState};

fn invalid_input(message: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let settings = match DibsSettings::load(Some(Path::new("config/development.toml"))) {
        Ok(settings) => settings,
        Err(error) => {
            tracing::error!(?error, "failed to load gateway settings");
            return Err(invalid_input("invalid gateway settings"));
        }
    };

    let gateway = match Dibs::new(settings) {
        Ok(gateway) => gateway,
        Err(error) => {
            tracing::error!(?error, "failed to construct the gateway adapter");
            return Err(invalid_input("invalid gateway configuration"));
        }
    };

    let state = AppState::new(Arc::new(gateway), Arc::new(InMemoryOrderStore::new()));

    tracing::info!("starting dibs router on 127.0.0.1:8080");
    HttpServer::new(move || App::new().service(routes::dibs(state.clone())))
        .bind(("127.0.0.1", 8080))?
        .run()
        .await
}
