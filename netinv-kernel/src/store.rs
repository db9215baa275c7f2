/**
 * DEVICE STORE - Gestion du cycle de vie des périphériques réseau
 *
 * RÔLE :
 * Ce module gère la persistance et les opérations CRUD sur l'inventaire :
 * chargement, validation, création, mise à jour partielle, suppression.
 *
 * FONCTIONNEMENT :
 * - Stockage en fichier JSON unique (map id -> device)
 * - Chaque opération recharge le fichier, mute en mémoire, réécrit tout
 * - Écriture atomique (fichier temporaire puis rename)
 * - Mutex unique sérialisant le cycle load-mutate-persist
 *
 * UTILITÉ DANS NETINV :
 * 🎯 API REST : toutes les routes /devices passent par ce store
 * 🎯 Invariants : unicité FQDN, modèles valides, IDs immuables
 * 🎯 Résilience : fichier absent ou corrompu = inventaire vide, jamais un crash
 */

use crate::models::{Device, DeviceUpdate, DevicesMap};
use parking_lot::Mutex;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// Modèles de périphériques acceptés à l'écriture
pub const VALID_MODELS: [&str; 3] = ["ios-xr", "ios-xe", "nx-os"];

/// Erreurs possibles lors des opérations sur le Device Store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("FQDN {0} already exists")]
    DuplicateFqdn(String),
    #[error("model {0} is not a valid model")]
    InvalidModel(String),
    #[error("device {0} does not exist")]
    NotFound(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct DeviceStore {
    /// Chemin du fichier de stockage JSON
    devices_file: PathBuf,
    /// Sérialise le cycle load-mutate-persist : deux écrivains concurrents
    /// sur un load périmé perdraient silencieusement des insertions
    write_lock: Mutex<()>,
}

pub type SharedDeviceStore = Arc<DeviceStore>;

impl DeviceStore {
    pub fn new<P: Into<PathBuf>>(devices_file: P) -> Self {
        let path = devices_file.into();
        eprintln!("[store] device store initialized at {:?}", path);
        Self {
            devices_file: path,
            write_lock: Mutex::new(()),
        }
    }

    /// Charge l'inventaire complet depuis le fichier JSON.
    /// Fichier absent, vide ou corrompu = map vide, jamais une erreur.
    /// Seules les vraies erreurs IO (permissions...) remontent.
    pub fn load_devices(&self) -> Result<DevicesMap, StoreError> {
        if !self.devices_file.exists() {
            return Ok(DevicesMap::new());
        }

        let content = fs::read_to_string(&self.devices_file)?;
        if content.trim().is_empty() {
            return Ok(DevicesMap::new());
        }

        match serde_json::from_str(&content) {
            Ok(devices) => Ok(devices),
            Err(e) => {
                eprintln!("[store] malformed devices file, starting fresh: {}", e);
                Ok(DevicesMap::new())
            }
        }
    }

    /// Réécrit l'inventaire complet sur disque.
    /// Écriture atomique : fichier temporaire puis rename, pour ne jamais
    /// laisser un fichier tronqué en cas de crash en pleine écriture.
    pub fn write_devices(&self, devices: &DevicesMap) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(devices)?;
        let tmp_path = self.devices_file.with_extension("json.tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.devices_file)?;
        Ok(())
    }

    /// Vérifie que le modèle fait partie des valeurs supportées
    pub fn model_valid(&self, model: &str) -> bool {
        VALID_MODELS.contains(&model)
    }

    /// Liste des modèles valides, pour construction des messages d'erreur
    pub fn valid_models(&self) -> &'static [&'static str] {
        &VALID_MODELS
    }

    /// Génère un identifiant UUID v4. Pas de vérification de collision
    /// contre l'inventaire existant : l'entropie 128 bits suffit.
    fn new_device_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    /// Construit un enregistrement device, sans transformation des champs
    fn format_device(&self, fqdn: &str, model: &str, version: &str) -> Device {
        Device {
            fqdn: fqdn.to_string(),
            model: model.to_string(),
            version: version.to_string(),
        }
    }

    fn fqdn_exists(devices: &DevicesMap, fqdn: &str) -> bool {
        devices.values().any(|dev| dev.fqdn == fqdn)
    }

    /// Liste tous les périphériques, indexés par identifiant
    pub fn list_devices(&self) -> Result<DevicesMap, StoreError> {
        let _guard = self.write_lock.lock();
        self.load_devices()
    }

    /// Récupère un périphérique par son identifiant.
    /// L'absence n'est pas une erreur côté store, c'est la couche HTTP
    /// qui traduit None en 404.
    pub fn get_device(&self, dev_id: &str) -> Result<Option<Device>, StoreError> {
        let _guard = self.write_lock.lock();
        let devices = self.load_devices()?;
        Ok(devices.get(dev_id).cloned())
    }

    /// Crée un nouveau périphérique et retourne son identifiant.
    /// L'unicité du FQDN est vérifiée avant la validité du modèle.
    pub fn create_device(
        &self,
        fqdn: &str,
        model: &str,
        version: &str,
    ) -> Result<String, StoreError> {
        let _guard = self.write_lock.lock();
        let mut devices = self.load_devices()?;

        if Self::fqdn_exists(&devices, fqdn) {
            return Err(StoreError::DuplicateFqdn(fqdn.to_string()));
        }
        if !self.model_valid(model) {
            return Err(StoreError::InvalidModel(model.to_string()));
        }

        let dev_id = self.new_device_id();
        devices.insert(dev_id.clone(), self.format_device(fqdn, model, version));
        self.write_devices(&devices)?;

        eprintln!("[store] created device {} ({})", fqdn, dev_id);
        Ok(dev_id)
    }

    /// Met à jour un périphérique existant. Seuls les champs fournis et
    /// non vides sont écrasés, les autres restent intacts.
    pub fn update_device(&self, dev_id: &str, update: &DeviceUpdate) -> Result<Device, StoreError> {
        let _guard = self.write_lock.lock();
        let mut devices = self.load_devices()?;

        if !devices.contains_key(dev_id) {
            return Err(StoreError::NotFound(dev_id.to_string()));
        }
        if let Some(model) = supplied(&update.model) {
            if !self.model_valid(model) {
                return Err(StoreError::InvalidModel(model.to_string()));
            }
        }

        let device = devices.get_mut(dev_id).ok_or_else(|| StoreError::NotFound(dev_id.to_string()))?;
        if let Some(fqdn) = supplied(&update.fqdn) {
            device.fqdn = fqdn.to_string();
        }
        if let Some(model) = supplied(&update.model) {
            device.model = model.to_string();
        }
        if let Some(version) = supplied(&update.version) {
            device.version = version.to_string();
        }
        let updated = device.clone();

        self.write_devices(&devices)?;
        eprintln!("[store] updated device {}", dev_id);
        Ok(updated)
    }

    /// Supprime un périphérique par son identifiant
    pub fn delete_device(&self, dev_id: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let mut devices = self.load_devices()?;

        if devices.remove(dev_id).is_none() {
            return Err(StoreError::NotFound(dev_id.to_string()));
        }

        self.write_devices(&devices)?;
        eprintln!("[store] deleted device {}", dev_id);
        Ok(())
    }
}

/// Champ de mise à jour effectivement fourni : présent et non vide
fn supplied(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}
