//! Configuration du décodage et de l'export

use serde::{Deserialize, Serialize};
use std::path::Path;

use anyhow::{Context, Result};
use geoaxe::{AssemblerOptions, DecoderOptions};

/// Presets embarqués
pub const PRESETS: &[&str] = &["default", "strict"];

/// Configuration principale
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub decoder: DecoderOptions,
    pub assembler: AssemblerOptions,
    pub export: ExportConfig,
}

/// Options d'export
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Nombre de décimales des coordonnées (7 ≈ 1 cm)
    pub precision: u8,

    /// Remplacer les points illisibles par le point sentinelle
    pub sentinel: bool,

    /// Exporter les points non validés (meilleur effort)
    pub keep_best_effort: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            precision: 7,
            sentinel: false,
            keep_best_effort: true,
        }
    }
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Charge une configuration depuis un preset embarqué
    pub fn from_preset(preset: &str) -> Result<Self> {
        match preset {
            "default" => Self::load_embedded(include_str!("presets/default.json")),
            "strict" => Self::load_embedded(include_str!("presets/strict.json")),
            _ => anyhow::bail!("Unknown preset: {}. Use: {}", preset, PRESETS.join(", ")),
        }
    }

    fn load_embedded(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse embedded config")
    }

    /// Nom de preset ou chemin vers un fichier JSON
    pub fn resolve(name_or_path: &str) -> Result<Self> {
        if PRESETS.contains(&name_or_path) {
            Self::from_preset(name_or_path)
        } else {
            Self::load(Path::new(name_or_path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preset_matches_defaults() {
        assert_eq!(Config::from_preset("default").unwrap(), Config::default());
    }

    #[test]
    fn test_strict_preset() {
        let config = Config::from_preset("strict").unwrap();
        assert!(config.assembler.drop_implausible);
        assert!(!config.export.keep_best_effort);
        assert_eq!(config.decoder.wkt_default_srid, 3857);
    }

    #[test]
    fn test_unknown_preset() {
        assert!(Config::from_preset("full").is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let path = std::env::temp_dir().join("geoaxe_partial_config.json");
        std::fs::write(&path, r#"{"decoder": {"wkt_default_srid": 4326}}"#).unwrap();

        let config = Config::resolve(path.to_str().unwrap()).unwrap();
        assert_eq!(config.decoder.wkt_default_srid, 4326);
        assert_eq!(config.export.precision, 7);
        assert!(!config.assembler.drop_implausible);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file() {
        assert!(Config::resolve("/nonexistent/geoaxe.json").is_err());
    }
}
