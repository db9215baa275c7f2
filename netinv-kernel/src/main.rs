/**
 * NETINV KERNEL - Point d'entrée principal du serveur d'inventaire
 *
 * RÔLE : Orchestration des modules : config, device store, HTTP.
 * Bootstrap du service avec gestion d'erreurs et logging.
 *
 * ARCHITECTURE : API REST Axum + Device Store persistant JSON.
 * UTILITÉ : Point d'administration unique de l'inventaire réseau.
 */

mod config;
mod http;
mod models;
mod store;

use crate::config::load_config;
use crate::http::AppState;
use crate::store::{DeviceStore, SharedDeviceStore};

use anyhow::Result;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    // Charger les variables d'environnement depuis .env (si présent)
    dotenvy::dotenv().ok(); // Ok si .env n'existe pas

    let cfg = load_config().await;

    // dossier data pour le fichier devices
    if let Some(parent) = Path::new(&cfg.store.devices_file).parent() {
        std::fs::create_dir_all(parent).unwrap_or_else(|e| {
            eprintln!("[kernel] warning: failed to create data dir: {}", e);
        });
    }

    let store: SharedDeviceStore = Arc::new(DeviceStore::new(&cfg.store.devices_file));
    match store.list_devices() {
        Ok(devices) => println!("[kernel] loaded {} devices", devices.len()),
        Err(e) => eprintln!("[kernel] failed to read devices file: {}", e),
    }

    // fabrique l'état unique pour Axum
    let app_state = AppState { store };

    // HTTP
    let app = http::build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.http.port));
    println!("[kernel] listening on http://{addr}");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
