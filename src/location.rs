//! Viewer location resolution for the place detail screen.
//!
//! [`LocationResolver`] produces a best-effort viewer coordinate through a
//! strict fallback chain: an externally supplied coordinate, then network
//! geolocation (no device sensors), then the device location provider. Every
//! failure degrades to "no coordinate"; nothing here is fatal and nothing is
//! retried.

use crate::models::Coordinate;
use color_eyre::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{error, info, warn};

/// Request settings handed to the device location provider.
#[derive(Debug, Clone, Copy)]
pub struct LocationOptions {
    pub high_accuracy: bool,
    pub timeout_ms: u64,
    pub max_cached_age_ms: u64,
}

impl Default for LocationOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: 10_000,
            max_cached_age_ms: 300_000, // accept a cached fix up to 5 minutes old
        }
    }
}

/// Position reported by a device location provider.
#[derive(Debug, Clone, Copy)]
pub struct DeviceFix {
    pub latitude: f64,
    pub longitude: f64,
    /// How old the fix is. Fixes beyond the caller's staleness allowance are rejected.
    pub age_ms: u64,
}

/// A source of high-accuracy device positions.
///
/// Failure carries a diagnostic message for the log; the resolver treats it
/// as a terminal tier failure either way.
pub trait DeviceLocationProvider {
    fn current_position(
        &self,
        opts: LocationOptions,
    ) -> impl Future<Output = Result<DeviceFix, String>> + Send;
}

/// Device provider backed by the position configured in `config.toml`.
///
/// There is no GPS to talk to from a terminal session, so the "device" tier
/// serves the manually configured coordinates when present and reports
/// unavailability otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualDeviceProvider {
    position: Option<(f64, f64)>,
}

impl ManualDeviceProvider {
    pub fn new(position: Option<(f64, f64)>) -> Self {
        Self { position }
    }
}

impl DeviceLocationProvider for ManualDeviceProvider {
    async fn current_position(&self, _opts: LocationOptions) -> Result<DeviceFix, String> {
        match self.position {
            Some((lat, lng)) => Ok(DeviceFix {
                latitude: lat,
                longitude: lng,
                age_ms: 0,
            }),
            None => Err("no device position configured".to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeolocateRequest {
    consider_ip: bool,
    wifi_access_points: Vec<serde_json::Value>,
    cell_towers: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GeolocateResponse {
    location: GeolocatePoint,
}

#[derive(Debug, Deserialize)]
struct GeolocatePoint {
    lat: f64,
    lng: f64,
}

/// Client for the network geolocation endpoint.
///
/// Sends a "consider network context" request (IP only, no access points or
/// cell towers) and reads the coordinate from the response body.
pub struct GeocodeClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GeocodeClient {
    pub fn new(endpoint: &str, api_key: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap(),
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub async fn locate(&self) -> Result<Coordinate> {
        let url = if self.api_key.is_empty() {
            self.endpoint.clone()
        } else {
            format!("{}?key={}", self.endpoint, self.api_key)
        };

        let body = GeolocateRequest {
            consider_ip: true,
            wifi_access_points: Vec::new(),
            cell_towers: Vec::new(),
        };

        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<GeolocateResponse>()
            .await?;

        Ok(Coordinate::new(res.location.lat, res.location.lng))
    }
}

/// One step of the resolution chain. Kept explicit so the tier precedence is
/// auditable rather than buried in nested conditionals.
#[derive(Debug)]
enum ResolveStep {
    TryExternal,
    TryGeocode,
    TryDevice,
    Done(Option<Coordinate>),
}

/// Resolves the viewer's coordinate without ever failing the caller.
pub struct LocationResolver<D> {
    geocode: GeocodeClient,
    device: D,
    options: LocationOptions,
    external: Option<Coordinate>,
}

impl<D: DeviceLocationProvider> LocationResolver<D> {
    pub fn new(geocode: GeocodeClient, device: D, external: Option<Coordinate>) -> Self {
        Self {
            geocode,
            device,
            options: LocationOptions::default(),
            external,
        }
    }

    /// Replaces the externally supplied coordinate; later [`resolve`](Self::resolve)
    /// calls re-adopt it without touching the network or device tiers.
    pub fn set_external(&mut self, external: Option<Coordinate>) {
        self.external = external;
    }

    /// Walks the tier chain and returns the first coordinate it produces.
    ///
    /// Safe to call again (e.g. when the viewed place changes); an external
    /// coordinate in force keeps short-circuiting the other tiers.
    pub async fn resolve(&self) -> Option<Coordinate> {
        let mut step = ResolveStep::TryExternal;

        loop {
            step = match step {
                ResolveStep::TryExternal => match self.external {
                    Some(coord) => {
                        info!("Using externally supplied location ({}, {})", coord.lat, coord.lng);
                        ResolveStep::Done(Some(coord))
                    }
                    None => ResolveStep::TryGeocode,
                },
                ResolveStep::TryGeocode => match self.geocode.locate().await {
                    Ok(coord) => {
                        info!("Network geolocation successful - ({}, {})", coord.lat, coord.lng);
                        ResolveStep::Done(Some(coord))
                    }
                    Err(e) => {
                        warn!("Network geolocation failed: {}. Trying device location.", e);
                        ResolveStep::TryDevice
                    }
                },
                ResolveStep::TryDevice => ResolveStep::Done(self.device_position().await),
                ResolveStep::Done(result) => return result,
            };
        }
    }

    /// Last tier: ask the device provider, bounded by the configured timeout
    /// and staleness allowance. Both success and failure are terminal.
    async fn device_position(&self) -> Option<Coordinate> {
        let timeout = Duration::from_millis(self.options.timeout_ms);
        let fix = match tokio::time::timeout(timeout, self.device.current_position(self.options)).await
        {
            Ok(Ok(fix)) => fix,
            Ok(Err(msg)) => {
                error!("Device location unavailable: {}", msg);
                return None;
            }
            Err(_) => {
                error!("Device location timed out after {}ms", self.options.timeout_ms);
                return None;
            }
        };

        if fix.age_ms > self.options.max_cached_age_ms {
            error!(
                "Device fix is {}ms old, beyond the {}ms allowance",
                fix.age_ms, self.options.max_cached_age_ms
            );
            return None;
        }

        info!("Device location successful - ({}, {})", fix.latitude, fix.longitude);
        Some(Coordinate::new(fix.latitude, fix.longitude))
    }
}
