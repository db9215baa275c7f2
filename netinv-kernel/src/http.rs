/**
 * API REST NETINV - Serveur HTTP principal
 *
 * RÔLE :
 * Ce module expose l'API REST de l'inventaire des périphériques réseau.
 * Couche mince : mapping route -> opération store, traduction des erreurs
 * du store en statuts HTTP.
 *
 * FONCTIONNEMENT :
 * - Serveur Axum, routes /devices pour le CRUD complet
 * - Sérialisation JSON automatique des réponses
 * - Erreurs structurées : 400 validation/doublon, 404 absent, 500 IO
 *
 * ROUTES :
 * GET    /                  -> bannière API
 * GET    /health            -> "ok"
 * GET    /devices           -> inventaire complet (map id -> device)
 * POST   /devices/{fqdn}    -> création (model + version dans le body)
 * GET    /devices/{id}      -> détail d'un périphérique
 * PATCH  /devices/{id}      -> mise à jour partielle
 * DELETE /devices/{id}      -> suppression
 */

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::models::{Device, DeviceBody, DeviceUpdate, DevicesMap};
use crate::store::{DeviceStore, SharedDeviceStore, StoreError};

#[derive(Clone)]
pub struct AppState {
    pub store: SharedDeviceStore,
}

type ApiError = (StatusCode, Json<serde_json::Value>);

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(|| async { "ok" }))
        .route("/devices", get(list_devices))
        .route("/devices/{id}", get(get_device).post(create_device).patch(update_device).delete(delete_device))
        .with_state(app_state)
}

/// Traduit une erreur store en réponse HTTP structurée
fn error_response(store: &DeviceStore, err: &StoreError) -> ApiError {
    let status = match err {
        StoreError::DuplicateFqdn(_) | StoreError::InvalidModel(_) => StatusCode::BAD_REQUEST,
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Serialization(_) | StoreError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = match err {
        StoreError::InvalidModel(_) => json!({ "error": err.to_string(), "valid_models": store.valid_models() }),
        _ => json!({ "error": err.to_string() }),
    };
    (status, Json(body))
}

async fn index() -> Json<serde_json::Value> {
    Json(json!({ "message": "Netinv API is running" }))
}

// GET /devices (inventaire complet)
async fn list_devices(State(app): State<AppState>) -> Result<Json<DevicesMap>, ApiError> {
    let devices = app.store.list_devices().map_err(|e| error_response(&app.store, &e))?;
    Ok(Json(devices))
}

// GET /devices/{id} (détail)
async fn get_device(
    State(app): State<AppState>,
    Path(dev_id): Path<String>,
) -> Result<Json<Device>, ApiError> {
    let device = app.store.get_device(&dev_id).map_err(|e| error_response(&app.store, &e))?;
    match device {
        Some(device) => Ok(Json(device)),
        None => Err(error_response(&app.store, &StoreError::NotFound(dev_id))),
    }
}

// POST /devices/{fqdn} (création, model et version dans le body)
async fn create_device(
    State(app): State<AppState>,
    Path(fqdn): Path<String>,
    Json(body): Json<DeviceBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let dev_id = app
        .store
        .create_device(&fqdn, &body.model, &body.version)
        .map_err(|e| error_response(&app.store, &e))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": dev_id,
            "message": format!("Created device {} ({})", fqdn, dev_id),
        })),
    ))
}

// PATCH /devices/{id} (mise à jour partielle)
async fn update_device(
    State(app): State<AppState>,
    Path(dev_id): Path<String>,
    Json(update): Json<DeviceUpdate>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let device = app
        .store
        .update_device(&dev_id, &update)
        .map_err(|e| error_response(&app.store, &e))?;

    Ok(Json(json!({
        "message": format!("Updated device {}", dev_id),
        "device": device,
    })))
}

// DELETE /devices/{id} (suppression)
async fn delete_device(
    State(app): State<AppState>,
    Path(dev_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    app.store.delete_device(&dev_id).map_err(|e| error_response(&app.store, &e))?;
    Ok(Json(json!({ "message": format!("Deleted device {}", dev_id) })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_error_status_mapping() {
        let dir = tempdir().unwrap();
        let store = DeviceStore::new(dir.path().join("devices.json"));

        let (status, _) = error_response(&store, &StoreError::DuplicateFqdn("r1.example.com".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = error_response(&store, &StoreError::InvalidModel("junos".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = error_response(&store, &StoreError::NotFound("abc".into()));
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = error_response(&store, &StoreError::Io(std::io::Error::other("disk")));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_model_lists_valid_models() {
        let dir = tempdir().unwrap();
        let store = DeviceStore::new(dir.path().join("devices.json"));
        let (_, Json(body)) = error_response(&store, &StoreError::InvalidModel("junos".into()));
        let models: Vec<&str> = body["valid_models"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(models, vec!["ios-xr", "ios-xe", "nx-os"]);
    }
}
