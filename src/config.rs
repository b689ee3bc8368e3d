//! Ustawienia uruchomieniowe: skąd czytać granice krajów, gdzie trzymać stan
//! użytkownika, migawki widżetów i logi.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_DATASET_FILE: &str = "countries.geojson";
pub const DEFAULT_STATE_DIR: &str = "state";
pub const DEFAULT_WIDGET_DIR: &str = "widget";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_LOG_FILE: &str = "terramark.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("nieznana projekcja '{0}' (dostępne: mercator, equirectangular)")]
    UnknownProjection(String),

    #[error("{field} nie może być pustą ścieżką")]
    EmptyPath { field: &'static str },

    #[error("{field} wskazuje na plik, a nie katalog: {path}")]
    NotADirectory { field: &'static str, path: PathBuf },
}

/// Rzutowanie (lon, lat) na płaszczyznę mapy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Projection {
    /// Mercator sferyczny, x = λ, y = ln(tan(π/4 + φ/2)) w radianach.
    #[default]
    Mercator,
    /// Bez zmian: x = lon, y = lat w stopniach.
    Equirectangular,
}

/// Mercator rozbiega się na biegunach; tniemy jak kafelki web-mercator.
pub const MERCATOR_MAX_LAT: f64 = 85.051_128_779_806_59;

impl Projection {
    pub fn project(self, lon: f64, lat: f64) -> (f64, f64) {
        match self {
            Projection::Equirectangular => (lon, lat),
            Projection::Mercator => {
                let lat = lat.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT).to_radians();
                let y = (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln();
                (lon.to_radians(), y)
            }
        }
    }
}

impl FromStr for Projection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mercator" => Ok(Projection::Mercator),
            "equirectangular" | "plate-carree" | "none" => Ok(Projection::Equirectangular),
            other => Err(ConfigError::UnknownProjection(other.to_string())),
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Projection::Mercator => f.write_str("mercator"),
            Projection::Equirectangular => f.write_str("equirectangular"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub dataset_file: String,
    pub state_dir: PathBuf,
    pub widget_dir: PathBuf,
    pub log_dir: PathBuf,
    pub projection: Projection,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            dataset_file: DEFAULT_DATASET_FILE.to_string(),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            widget_dir: PathBuf::from(DEFAULT_WIDGET_DIR),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            projection: Projection::default(),
        }
    }
}

impl AppConfig {
    pub fn dataset_path(&self) -> PathBuf {
        self.data_dir.join(&self.dataset_file)
    }

    /// Sprawdza ścieżki zanim cokolwiek zostanie utworzone na dysku.
    /// Nieistniejące katalogi są w porządku, zostaną założone przy zapisie.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_dir("data_dir", &self.data_dir)?;
        check_dir("state_dir", &self.state_dir)?;
        check_dir("widget_dir", &self.widget_dir)?;
        check_dir("log_dir", &self.log_dir)?;
        if self.dataset_file.trim().is_empty() {
            return Err(ConfigError::EmptyPath { field: "dataset_file" });
        }
        Ok(())
    }
}

fn check_dir(field: &'static str, path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::EmptyPath { field });
    }
    if path.is_file() {
        return Err(ConfigError::NotADirectory {
            field,
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_projection_names() {
        assert_eq!("Mercator".parse::<Projection>().unwrap(), Projection::Mercator);
        assert_eq!(
            " equirectangular ".parse::<Projection>().unwrap(),
            Projection::Equirectangular
        );
        assert!(matches!(
            "robinson".parse::<Projection>(),
            Err(ConfigError::UnknownProjection(_))
        ));
    }

    #[test]
    fn mercator_keeps_equator_and_orientation() {
        let (x, y) = Projection::Mercator.project(0.0, 0.0);
        assert!(x.abs() < 1e-12 && y.abs() < 1e-12);

        let (_, north) = Projection::Mercator.project(10.0, 60.0);
        let (_, south) = Projection::Mercator.project(10.0, -60.0);
        assert!(north > 0.0 && south < 0.0);
        assert!((north + south).abs() < 1e-12);
    }

    #[test]
    fn mercator_clamps_poles() {
        let (_, pole) = Projection::Mercator.project(0.0, 90.0);
        let (_, edge) = Projection::Mercator.project(0.0, MERCATOR_MAX_LAT);
        assert!(pole.is_finite());
        assert_eq!(pole, edge);
    }

    #[test]
    fn default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dataset_path(), PathBuf::from("data/countries.geojson"));
    }

    #[test]
    fn rejects_file_as_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plik");
        std::fs::write(&file, "x").unwrap();

        let config = AppConfig {
            state_dir: file,
            ..AppConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotADirectory { field: "state_dir", .. })
        ));
    }

    #[test]
    fn rejects_empty_dataset_name() {
        let config = AppConfig {
            dataset_file: "  ".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyPath { field: "dataset_file" })
        ));
    }
}
