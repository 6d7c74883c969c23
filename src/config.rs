// Copyright (c) 2026 Pegasus Heavy Industries LLC
// Licensed under the MIT License

//! Configuration file handling.
//!
//! Holds default session inputs, an optional user curve to import at
//! start-up and per-chemistry derating overrides, stored as TOML.
//! Default path: `evcharge.toml` in the working directory.

use crate::simulator::{ChargeSession, DEFAULT_MAX_POWER_KW};
use crate::temperature::{Breakpoint, Chemistry, DEFAULT_AMBIENT_TEMP_C, TemperatureModel};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default config file location.
pub const DEFAULT_CONFIG_PATH: &str = "evcharge.toml";

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Session inputs used when not given on the command line.
    #[serde(default)]
    pub session: SessionConfig,

    /// Curve sources.
    #[serde(default)]
    pub curve: CurveConfig,

    /// Derating tables replacing the built-in ones, keyed by chemistry
    /// name ("LFP", "NMC", "NCA" or "UNKNOWN").
    #[serde(default)]
    pub temperature: BTreeMap<String, Vec<Breakpoint>>,
}

/// Default charging session inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_start_soc")]
    pub start_soc: u8,

    #[serde(default = "default_end_soc")]
    pub end_soc: u8,

    /// Charger power cap in kW.
    #[serde(default = "default_max_power")]
    pub max_power_kw: f64,

    #[serde(default = "default_ambient_temp")]
    pub ambient_temp_c: f64,

    #[serde(default)]
    pub chemistry: Chemistry,

    #[serde(default)]
    pub preheated: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        ChargeSession::default().into()
    }
}

impl From<ChargeSession> for SessionConfig {
    fn from(session: ChargeSession) -> Self {
        Self {
            start_soc: session.start_soc,
            end_soc: session.end_soc,
            max_power_kw: session.max_power_kw,
            ambient_temp_c: session.ambient_temp_c,
            chemistry: session.chemistry,
            preheated: session.preheated,
        }
    }
}

impl SessionConfig {
    pub fn to_session(&self) -> ChargeSession {
        ChargeSession::new(
            self.start_soc,
            self.end_soc,
            self.max_power_kw,
            self.ambient_temp_c,
            self.chemistry,
            self.preheated,
        )
    }
}

/// Curve sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurveConfig {
    /// CSV file to import as the user curve at start-up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_curve: Option<PathBuf>,
}

impl Config {
    /// Derating model with this config's overrides applied.
    pub fn temperature_model(&self) -> TemperatureModel {
        let mut overrides = HashMap::new();
        let mut keys: HashMap<Chemistry, &str> = HashMap::new();
        // Keys are visited in sorted order. When several name the same
        // chemistry, the canonical spelling wins, otherwise the first key.
        for (name, table) in &self.temperature {
            let chemistry = name.parse::<Chemistry>().unwrap_or_default();
            if chemistry == Chemistry::Unknown && !name.eq_ignore_ascii_case("unknown") {
                log::warn!("Unrecognised chemistry '{name}' in config, applying to UNKNOWN");
            }
            if let Some(&kept) = keys.get(&chemistry) {
                let replace = name == chemistry.label() && kept != chemistry.label();
                let winner = if replace { name.as_str() } else { kept };
                log::warn!(
                    "Config keys '{kept}' and '{name}' both set the {chemistry} table, using '{winner}'"
                );
                if !replace {
                    continue;
                }
            }
            keys.insert(chemistry, name);
            overrides.insert(chemistry, table.clone());
        }
        TemperatureModel::with_overrides(&overrides)
    }
}

// ---------------------------------------------------------------------------
// Load / Save
// ---------------------------------------------------------------------------

/// Load config from a TOML file, or return the default if the file doesn't exist.
pub fn load_config(path: &Path) -> io::Result<Config> {
    if !path.exists() {
        log::info!("No config file at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let contents = fs::read_to_string(path)?;
    let config = parse_config(&contents)?;

    log::info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Parse config from TOML text.
pub fn parse_config(contents: &str) -> io::Result<Config> {
    toml::from_str(contents).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Failed to parse config: {e}"),
        )
    })
}

/// Save config to a TOML file, creating parent directories if needed.
pub fn save_config(path: &Path, config: &Config) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(config).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Failed to serialize config: {e}"),
        )
    })?;

    fs::write(path, contents)?;
    log::info!("Saved config to {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn default_start_soc() -> u8 {
    ChargeSession::default().start_soc
}

fn default_end_soc() -> u8 {
    ChargeSession::default().end_soc
}

fn default_max_power() -> f64 {
    DEFAULT_MAX_POWER_KW
}

fn default_ambient_temp() -> f64 {
    DEFAULT_AMBIENT_TEMP_C
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.session.to_session(), ChargeSession::default());
        assert!(cfg.curve.user_curve.is_none());
        assert!(cfg.temperature.is_empty());
        assert_eq!(cfg.session.chemistry, Chemistry::Unknown);
        assert_eq!(cfg.session.ambient_temp_c, DEFAULT_AMBIENT_TEMP_C);
    }

    #[test]
    fn test_default_config_serializes_unknown_chemistry() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(text.contains("chemistry = \"UNKNOWN\""));
        assert!(text.contains("max_power_kw = 250.0"));
        let back = parse_config(&text).unwrap();
        assert_eq!(back.session.to_session(), ChargeSession::default());
    }

    #[test]
    fn test_partial_session_section() {
        let cfg = parse_config(
            r#"
            [session]
            end_soc = 90
            chemistry = "LFP"
            preheated = true
            "#,
        )
        .unwrap();
        let session = cfg.session.to_session();
        assert_eq!(session.start_soc, 20);
        assert_eq!(session.end_soc, 90);
        assert_eq!(session.chemistry, Chemistry::Lfp);
        assert!(session.preheated);
        assert_eq!(session.max_power_kw, DEFAULT_MAX_POWER_KW);
    }

    #[test]
    fn test_temperature_overrides() {
        let cfg = parse_config(
            r#"
            [temperature]
            NMC = [
                { temp_c = 15.0, multiplier = 0.8 },
                { temp_c = -5.0, multiplier = 0.3 },
            ]
            "#,
        )
        .unwrap();
        let model = cfg.temperature_model();
        assert_eq!(model.multiplier(-10.0, Chemistry::Nmc, false), 0.3);
        assert!((model.multiplier(5.0, Chemistry::Nmc, false) - 0.55).abs() < 1e-9);
        assert_eq!(model.multiplier(15.0, Chemistry::Nmc, false), 1.0);
        assert_eq!(model.multiplier(-10.0, Chemistry::Lfp, false), 0.35);
    }

    #[test]
    fn test_chemistry_names_are_lenient() {
        let cfg = parse_config("[session]\nchemistry = \"nca\"").unwrap();
        assert_eq!(cfg.session.chemistry, Chemistry::Nca);

        let cfg = parse_config(
            r#"
            [session]
            chemistry = "sodium-ion"

            [temperature]
            lfp = [{ temp_c = 10.0, multiplier = 0.5 }]
            solid-state = [{ temp_c = 30.0, multiplier = 0.2 }]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.session.chemistry, Chemistry::Unknown);

        let model = cfg.temperature_model();
        assert_eq!(model.multiplier(0.0, Chemistry::Lfp, false), 0.5);
        assert_eq!(model.multiplier(0.0, Chemistry::Unknown, false), 0.2);
        assert_eq!(model.multiplier(0.0, Chemistry::Nmc, false), 0.45);
    }

    #[test]
    fn test_duplicate_chemistry_keys_resolve_deterministically() {
        let cfg = parse_config(
            r#"
            [temperature]
            lfp = [{ temp_c = 10.0, multiplier = 0.5 }]
            LFP = [{ temp_c = 10.0, multiplier = 0.3 }]
            Lfp = [{ temp_c = 10.0, multiplier = 0.1 }]
            sodium = [{ temp_c = 10.0, multiplier = 0.6 }]
            graphene = [{ temp_c = 10.0, multiplier = 0.2 }]
            "#,
        )
        .unwrap();
        for _ in 0..5 {
            let model = cfg.temperature_model();
            assert_eq!(model.multiplier(0.0, Chemistry::Lfp, false), 0.3);
            // "graphene" sorts before "sodium"
            assert_eq!(model.multiplier(0.0, Chemistry::Unknown, false), 0.2);
        }
    }

    #[test]
    fn test_invalid_config_is_invalid_data() {
        let err = parse_config("[session]\nstart_soc = \"lots\"").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("evcharge-config-{}", std::process::id()));
        let path = dir.join("nested").join("evcharge.toml");

        let mut cfg = Config::default();
        cfg.session.max_power_kw = 120.0;
        cfg.curve.user_curve = Some(PathBuf::from("session.csv"));
        save_config(&path, &cfg).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.session.max_power_kw, 120.0);
        assert_eq!(loaded.curve.user_curve, Some(PathBuf::from("session.csv")));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let cfg = load_config(Path::new("/nonexistent/evcharge.toml")).unwrap();
        assert_eq!(cfg.session.end_soc, 80);
    }
}
