//! Configuration loading.
//!
//! Resolution order for the config file:
//! 1. explicit path (`--config` or `KUNDALI_CONFIG`)
//! 2. `<config dir>/kundali/config.toml` when it exists
//! 3. compiled defaults

use crate::chart::{HouseBasis, Layout};
use crate::cities::{CityEntry, Gazetteer};
use crate::render::Format;
use crate::{AstrologyError, ChartSettings, Reference, Result, Zodiac};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub country: Option<String>,
    pub city: Option<String>,
    pub utc_offset: Option<String>,
    pub format: Format,
    pub layout: Layout,
    pub houses: HouseBasis,
    pub zodiac: Zodiac,
    pub reference: Reference,
    pub nodes: bool,
    pub topocentric: bool,
    pub size: u32,
    pub cities: Vec<CityEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            country: None,
            city: None,
            utc_offset: None,
            format: Format::Svg,
            layout: Layout::Diamond,
            houses: HouseBasis::Sign,
            zodiac: Zodiac::Tropical,
            reference: Reference::RightAscension,
            nodes: false,
            topocentric: true,
            size: 800,
            cities: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AstrologyError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = Config::from_toml_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Loads the explicit file if given, else the per-user file if present,
    /// else defaults. A missing explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Config::load_file(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Config::load_file(&path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Config::default())
            }
        }
    }

    pub fn settings(&self) -> ChartSettings {
        ChartSettings {
            zodiac: self.zodiac,
            reference: self.reference,
            include_nodes: self.nodes,
            topocentric: self.topocentric,
        }
    }

    pub fn gazetteer(&self) -> Result<Gazetteer> {
        Gazetteer::with_extra(&self.cities)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("kundali").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.settings().topocentric);
        assert_eq!(config.settings().reference, Reference::RightAscension);
    }

    #[test]
    fn values_use_cli_spelling() {
        let config = Config::from_toml_str(
            r#"
            country = "India"
            city = "Chennai"
            format = "table"
            layout = "north-indian"
            houses = "whole-sign"
            zodiac = "sidereal"
            reference = "ecliptic"
            nodes = true
            topocentric = false
            "#,
        )
        .unwrap();
        assert_eq!(config.layout, Layout::NorthIndian);
        assert_eq!(config.houses, HouseBasis::WholeSign);
        assert_eq!(config.format, Format::Table);
        let settings = config.settings();
        assert_eq!(settings.zodiac, Zodiac::Sidereal);
        assert_eq!(settings.reference, Reference::Ecliptic);
        assert!(settings.include_nodes);
        assert!(!settings.topocentric);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::from_toml_str("colour = \"blue\"").unwrap_err();
        assert!(matches!(err, AstrologyError::Toml(_)));
    }

    #[test]
    fn loads_extra_cities_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            country = "India"
            city = "Kochi"

            [[cities]]
            country = "India"
            name = "Kochi"
            latitude = 9.9312
            longitude = 76.2673
            "#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        let gazetteer = config.gazetteer().unwrap();
        let kochi = gazetteer.lookup("India", "Kochi").unwrap();
        assert_eq!(kochi.latitude, 9.9312);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(
            Config::load(Some(&path)),
            Err(AstrologyError::Config(_))
        ));
    }
}
