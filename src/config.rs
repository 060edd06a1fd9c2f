use crate::models::Coordinate;
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::{info, warn};

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub place: PlaceConfig,
    pub location: LocationConfig,
    pub geolocation: GeolocationConfig,
    pub api: ApiConfig,
    pub data: DataConfig,
    pub locale: LocaleConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PlaceConfig {
    pub default_id: String, // Place opened when no id is given on the CLI
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct LocationConfig {
    pub external_lat: Option<f64>, // Known viewer position; skips all resolution
    pub external_lng: Option<f64>,
    pub device_lat: Option<f64>, // Position served by the device provider tier
    pub device_lng: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct GeolocationConfig {
    pub endpoint: String,
    pub api_key: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct DataConfig {
    pub fallback_path: String, // Bundled place dataset used when the service fails
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct LocaleConfig {
    pub anonymous_label: String,
    pub no_date_label: String,
    pub date_format: String, // chrono strftime, default renders like ko-KR short dates
}

impl Default for PlaceConfig {
    fn default() -> Self {
        Self {
            default_id: "1".to_string(),
        }
    }
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://www.googleapis.com/geolocation/v1/geolocate".to_string(),
            api_key: String::new(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.placewave.app/v1".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            fallback_path: "data/places.json".to_string(),
        }
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            anonymous_label: "익명".to_string(),
            no_date_label: "날짜 없음".to_string(),
            date_format: "%Y. %-m. %-d.".to_string(),
        }
    }
}

impl LocationConfig {
    /// Externally supplied viewer coordinate; only complete pairs count.
    pub fn external_coordinate(&self) -> Option<Coordinate> {
        match (self.external_lat, self.external_lng) {
            (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
            _ => None,
        }
    }

    /// Position the device location provider serves, if one is configured.
    pub fn device_position(&self) -> Option<(f64, f64)> {
        match (self.device_lat, self.device_lng) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}

impl Config {
    /// Loads the given TOML config file.
    /// If it doesn't exist, creates a default one.
    pub fn load(path: &str) -> Self {
        if let Ok(content) = fs::read_to_string(path) {
            match toml::from_str(&content) {
                Ok(config) => return config,
                Err(e) => warn!("Failed to parse {}: {}. Using defaults.", path, e),
            }
        }

        let default_config = Config::default();

        // Save default config to disk for the user to edit later
        match toml::to_string_pretty(&default_config) {
            Ok(toml_string) => {
                if fs::write(path, toml_string).is_err() {
                    warn!("Could not write default {} to disk.", path);
                }
            }
            Err(e) => warn!("Could not serialize default config: {}", e),
        }

        info!("Loaded default configuration.");
        default_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_coordinate_requires_both_components() {
        let mut loc = LocationConfig::default();
        assert_eq!(loc.external_coordinate(), None);

        loc.external_lat = Some(37.5665);
        assert_eq!(loc.external_coordinate(), None);

        loc.external_lng = Some(126.9780);
        assert_eq!(
            loc.external_coordinate(),
            Some(Coordinate::new(37.5665, 126.9780))
        );
    }

    #[test]
    fn partial_toml_fills_missing_sections_with_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            base_url = "http://localhost:9090"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "http://localhost:9090");
        assert_eq!(config.api.timeout_seconds, 10);
        assert_eq!(config.locale.anonymous_label, "익명");
        assert_eq!(config.data.fallback_path, "data/places.json");
    }
}
