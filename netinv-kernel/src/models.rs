use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Device {
    pub fqdn: String,
    pub model: String,
    pub version: String,
}

/// Corps de requête pour la création (le fqdn vient du path)
#[derive(Debug, Deserialize)]
pub struct DeviceBody {
    pub model: String,
    pub version: String,
}

/// Mise à jour partielle : champ absent = inchangé.
/// Un champ présent mais vide ("") est lui aussi ignoré, il n'y a
/// pas de moyen de vider un champ via update.
#[derive(Debug, Default, Deserialize)]
pub struct DeviceUpdate {
    pub fqdn: Option<String>,
    pub model: Option<String>,
    pub version: Option<String>,
}

pub type DevicesMap = HashMap<String, Device>;
