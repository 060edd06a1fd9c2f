//! Bundled static place dataset, used only when the place service fails.
//!
//! The dataset ships as `data/places.json` and is loaded once at startup
//! into a read-only lookup table that gets injected into the fetcher. A
//! missing or unreadable file degrades to an empty table; the screen then
//! simply renders its defaults for unknown ids.

use crate::models::PlaceRecord;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use tracing::{info, warn};

/// One pre-baked place entry. Unlike the service payload it carries a
/// pre-formatted distance string, an industry label, and a bookmark flag,
/// and no coordinate.
#[derive(Debug, Clone, Deserialize)]
pub struct FallbackPlace {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub bookmark: bool,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub distance: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub images: Vec<String>,
}

impl From<&FallbackPlace> for PlaceRecord {
    fn from(place: &FallbackPlace) -> Self {
        Self {
            name: place.name.clone(),
            rating: place.rating,
            address: place.address.clone(),
            industry: (!place.industry.is_empty()).then(|| place.industry.clone()),
            images: place.images.clone(),
            coordinate: None,
            distance: (!place.distance.is_empty()).then(|| place.distance.clone()),
            bookmark: place.bookmark,
        }
    }
}

/// Read-only lookup table over the bundled entries, keyed by string id.
#[derive(Debug, Default)]
pub struct FallbackStore {
    places: HashMap<String, FallbackPlace>,
}

impl FallbackStore {
    pub fn from_entries(entries: Vec<FallbackPlace>) -> Self {
        Self {
            places: entries.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<FallbackPlace> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries))
    }

    /// Loads the dataset from disk, degrading to an empty store on any error.
    pub fn load(path: &str) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Failed to read fallback dataset '{}': {}", path, e);
                return Self::default();
            }
        };

        match Self::from_json(&content) {
            Ok(store) => {
                info!("Loaded {} bundled places from '{}'", store.len(), path);
                store
            }
            Err(e) => {
                warn!("Failed to parse fallback dataset '{}': {}", path, e);
                Self::default()
            }
        }
    }

    /// Exact-match lookup by place id.
    pub fn lookup(&self, id: &str) -> Option<&FallbackPlace> {
        self.places.get(id)
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}
