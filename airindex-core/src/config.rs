//! Configuration file support for Airindex
//!
//! Loads optional overrides from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.airindexrc.json` in the working directory
//! 3. `airindex.config.json` in the working directory
//!
//! All fields are optional. CLI flags take precedence over config file values.

use crate::band::{validate_bands, AqiBand, BandTable};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default bind host for `airindex serve`
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default bind port for `airindex serve`
pub const DEFAULT_PORT: u16 = 8000;

/// Airindex configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AirindexConfig {
    /// Replacement band table (must tile 0-500)
    #[serde(default)]
    pub bands: Option<Vec<AqiBand>>,

    /// HTTP service settings
    #[serde(default)]
    pub server: Option<ServerConfig>,
}

/// HTTP service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind host (default: 127.0.0.1)
    pub host: Option<String>,
    /// Bind port (default: 8000)
    pub port: Option<u16>,
}

/// Resolved configuration ready for use
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub bands: BandTable,
    pub host: String,
    pub port: u16,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl AirindexConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        if let Some(ref bands) = self.bands {
            validate_bands(bands).context("invalid bands")?;
        }

        if let Some(ref server) = self.server {
            if let Some(ref host) = server.host {
                if host.trim().is_empty() {
                    anyhow::bail!("server.host must not be empty");
                }
            }
        }

        Ok(())
    }

    /// Resolve config into its final form
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let bands = match &self.bands {
            Some(bands) => BandTable::new(bands.clone())?,
            None => BandTable::canonical(),
        };

        let (host, port) = match &self.server {
            Some(s) => (
                s.host.clone().unwrap_or_else(|| DEFAULT_HOST.to_string()),
                s.port.unwrap_or(DEFAULT_PORT),
            ),
            None => (DEFAULT_HOST.to_string(), DEFAULT_PORT),
        };

        Ok(ResolvedConfig {
            bands,
            host,
            port,
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Self {
        ResolvedConfig {
            bands: BandTable::canonical(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            config_path: None,
        }
    }
}

/// Discover and load a config file from a directory
///
/// Search order:
/// 1. `.airindexrc.json`
/// 2. `airindex.config.json`
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(dir: &Path) -> Result<Option<(AirindexConfig, PathBuf)>> {
    for name in [".airindexrc.json", "airindex.config.json"] {
        let path = dir.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }

    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<AirindexConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: AirindexConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Load and resolve config
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config in `dir`.
/// Returns default config if nothing is found.
pub fn load_and_resolve(dir: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(dir)? {
            Some((config, path)) => (config, Some(path)),
            None => (AirindexConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const TWO_BANDS: &str = r##"{
        "bands": [
            {"level": "Clean", "min": 0, "max": 199, "color": "#00ff00", "message": "Breathe easy."},
            {"level": "Dirty", "min": 200, "max": 500, "color": "#ff0000", "message": "Stay in."}
        ]
    }"##;

    #[test]
    fn test_default_config_is_valid() {
        let config = AirindexConfig::default();
        config.validate().expect("default config should be valid");
        let resolved = config.resolve().expect("default config should resolve");
        assert_eq!(resolved.bands, BandTable::canonical());
        assert_eq!(resolved.host, "127.0.0.1");
        assert_eq!(resolved.port, 8000);
        assert!(resolved.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: AirindexConfig = serde_json::from_str("{}").unwrap();
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_full_config() {
        let json = r##"{
            "bands": [
                {"level": "Clean", "min": 0, "max": 199, "color": "#00ff00", "message": "Breathe easy."},
                {"level": "Dirty", "min": 200, "max": 500, "color": "#ff0000", "message": "Stay in."}
            ],
            "server": {"host": "0.0.0.0", "port": 9090}
        }"##;
        let config: AirindexConfig = serde_json::from_str(json).unwrap();
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.bands.bands().len(), 2);
        assert_eq!(resolved.bands.band_for_value(200).unwrap().level, "Dirty");
        assert_eq!(resolved.host, "0.0.0.0");
        assert_eq!(resolved.port, 9090);
    }

    #[test]
    fn test_partial_server_config() {
        let config: AirindexConfig = serde_json::from_str(r#"{"server": {"port": 8181}}"#).unwrap();
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.host, "127.0.0.1");
        assert_eq!(resolved.port, 8181);
    }

    #[test]
    fn test_reject_unknown_fields() {
        let result: Result<AirindexConfig, _> = serde_json::from_str(r#"{"unknown_field": true}"#);
        assert!(result.is_err(), "unknown fields should be rejected");
        let result: Result<AirindexConfig, _> =
            serde_json::from_str(r#"{"server": {"hostname": "x"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_reject_gapped_bands() {
        let json = r##"{"bands": [
            {"level": "A", "min": 0, "max": 100, "color": "#000000", "message": ""},
            {"level": "B", "min": 150, "max": 500, "color": "#000000", "message": ""}
        ]}"##;
        let config: AirindexConfig = serde_json::from_str(json).unwrap();
        let err = config.validate().unwrap_err();
        assert!(format!("{:#}", err).contains("must start at 101"));
    }

    #[test]
    fn test_reject_empty_host() {
        let config: AirindexConfig = serde_json::from_str(r#"{"server": {"host": " "}}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_discover_airindexrc() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(".airindexrc.json");
        fs::write(&config_path, TWO_BANDS).unwrap();

        let (config, path) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.bands.unwrap().len(), 2);
        assert_eq!(path, config_path);
    }

    #[test]
    fn test_discover_prefers_rc_over_config_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".airindexrc.json"), r#"{"server": {"port": 1}}"#).unwrap();
        fs::write(dir.path().join("airindex.config.json"), r#"{"server": {"port": 2}}"#).unwrap();

        let resolved = load_and_resolve(dir.path(), None).unwrap();
        assert_eq!(resolved.port, 1);
    }

    #[test]
    fn test_discover_config_json() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("airindex.config.json");
        fs::write(&config_path, r#"{"server": {"port": 2}}"#).unwrap();

        let resolved = load_and_resolve(dir.path(), None).unwrap();
        assert_eq!(resolved.port, 2);
        assert_eq!(resolved.config_path, Some(config_path));
    }

    #[test]
    fn test_discover_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_config(dir.path()).unwrap().is_none());
        let resolved = load_and_resolve(dir.path(), None).unwrap();
        assert!(resolved.config_path.is_none());
        assert_eq!(resolved.bands, BandTable::canonical());
    }

    #[test]
    fn test_explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".airindexrc.json"), r#"{"server": {"port": 1}}"#).unwrap();
        let explicit = dir.path().join("custom.json");
        fs::write(&explicit, TWO_BANDS).unwrap();

        let resolved = load_and_resolve(dir.path(), Some(&explicit)).unwrap();
        assert_eq!(resolved.port, DEFAULT_PORT);
        assert_eq!(resolved.bands.bands()[0].level, "Clean");
        assert_eq!(resolved.config_path, Some(explicit));
    }

    #[test]
    fn test_invalid_json_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse config file"));
    }
}
