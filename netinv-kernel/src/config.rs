use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct KernelConfig {
    pub http: HttpConf,
    pub store: StoreConf,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HttpConf {
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StoreConf {
    pub devices_file: String,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            http: HttpConf { port: 8080 },
            store: StoreConf { devices_file: "./data/devices.json".into() },
        }
    }
}

pub async fn load_config() -> KernelConfig {
    let path = std::env::var("NETINV_KERNEL_CONFIG").unwrap_or_else(|_| "netinv.yaml".into());
    if Path::new(&path).exists() {
        let txt = fs::read_to_string(&path).await.unwrap_or_default();
        if txt.trim().is_empty() { return KernelConfig::default(); }
        serde_yaml::from_str(&txt).unwrap_or_else(|e| {
            eprintln!("[kernel] config invalide: {e}");
            KernelConfig::default()
        })
    } else {
        eprintln!("[kernel] pas de netinv.yaml, usage config par défaut");
        KernelConfig::default()
    }
}
