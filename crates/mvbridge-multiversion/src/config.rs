use crate::{adapter_for, Translator, SUPPORTED_VERSIONS};
use anyhow::Context;
use mvbridge_mappings::{CanonicalRegistry, MappingTable, Remapper};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize)]
pub struct TranslatorConfig {
    /// Holds `latest.json` plus one `<protocol>.json` per legacy version.
    #[serde(default = "default_mappings_dir")]
    pub mappings_dir: PathBuf,
    /// Legacy protocol numbers to accept.
    #[serde(default = "default_versions")]
    pub versions: Vec<i32>,
    #[serde(default = "default_shield_item")]
    pub shield_item: String,
    #[serde(default = "default_enable_limits")]
    pub enable_limits: bool,
}

fn default_mappings_dir() -> PathBuf {
    "mappings".into()
}

fn default_versions() -> Vec<i32> {
    SUPPORTED_VERSIONS.iter().map(|version| version.id).collect()
}

fn default_shield_item() -> String {
    "minecraft:shield".into()
}

fn default_enable_limits() -> bool {
    true
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            mappings_dir: default_mappings_dir(),
            versions: default_versions(),
            shield_item: default_shield_item(),
            enable_limits: default_enable_limits(),
        }
    }
}

impl TranslatorConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: TranslatorConfig = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::info!("No config file found at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    fn mapping_path(&self, name: &str) -> PathBuf {
        self.mappings_dir.join(format!("{}.json", name))
    }
}

impl Translator {
    /// Load the mapping tables named by `config` and build every adapter the
    /// accepted versions need.
    pub fn from_config(config: &TranslatorConfig) -> anyhow::Result<Self> {
        for &protocol in &config.versions {
            if !SUPPORTED_VERSIONS.iter().any(|version| version.id == protocol) {
                anyhow::bail!("Unsupported protocol version {} in config", protocol);
            }
        }

        let latest_path = config.mapping_path("latest");
        let latest: Arc<dyn CanonicalRegistry> = Arc::new(
            MappingTable::load(&latest_path)
                .with_context(|| format!("Failed to load {}", latest_path.display()))?,
        );

        // Older versions convert through every newer adapter.
        let oldest = config.versions.iter().copied().min();
        let mut adapters = Vec::new();
        for version in SUPPORTED_VERSIONS {
            if oldest.map_or(true, |oldest| version.id < oldest) {
                continue;
            }
            let path = config.mapping_path(&version.id.to_string());
            let table = MappingTable::load(&path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            let remapper = Remapper::new(Arc::new(table), Arc::clone(&latest))?;
            if let Some(adapter) = adapter_for(version.id, remapper) {
                adapters.push(adapter);
            }
        }

        let mut translator = Translator::new(adapters, latest, &config.shield_item, config.enable_limits);
        translator.accept_only(&config.versions);
        tracing::info!("Translator ready for protocols {:?}", translator.protocols());
        Ok(translator)
    }
}
