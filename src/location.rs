//! Device positioning for amenity-finder.
//!
//! This module provides the "locate me" capability: a check for whether
//! positioning is available at all, and an asynchronous resolution of the
//! current position.
//!
//! It defines the `PositioningProvider` trait as an interface for different
//! positioning backends. The CLI implementation reads a fixed position from
//! the `AMENITY_DEVICE_POSITION` environment variable or the config file;
//! a platform with real positioning hardware would supply its own provider.

use std::env;

use log::debug;
use thiserror::Error;

use crate::config::Config;
use crate::geo::Coordinates;

/// Environment variable holding the device position as `"lat,lon"`.
pub const POSITION_ENV_VAR: &str = "AMENITY_DEVICE_POSITION";

/// Reasons position detection can fail
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    /// Positioning is not available on this device at all
    #[error("positioning is not available on this device")]
    Unsupported,
    /// The platform refused access to the position
    #[error("permission to read the device position was denied")]
    PermissionDenied,
    /// The platform has positioning but could not produce a position
    #[error("device position is unavailable: {0}")]
    PositionUnavailable(String),
}

/// Interface for positioning backends
#[allow(async_fn_in_trait)]
pub trait PositioningProvider {
    /// Capability check; no side effects.
    fn can_detect_location(&self) -> bool;

    /// Resolves the current device position. Fails with
    /// [`LocationError::Unsupported`] when [`can_detect_location`] is
    /// false. One outstanding request per invocation; no retry and no
    /// timeout at this layer.
    ///
    /// [`can_detect_location`]: PositioningProvider::can_detect_location
    async fn detect_location(&self) -> Result<Coordinates, LocationError>;
}

/// Positioning backed by a configured fixed position.
///
/// The environment variable takes precedence over the config file, so a
/// shell session can override where "here" is without editing config.
pub struct ConfiguredPositioning {
    raw: Option<String>,
}

impl ConfiguredPositioning {
    pub fn from_config(config: &Config) -> Self {
        let raw = env::var(POSITION_ENV_VAR).ok().or_else(|| {
            config
                .device_position
                .map(|[lat, lon]| format!("{lat},{lon}"))
        });

        Self { raw }
    }

    fn parse_position(raw: &str) -> Result<Coordinates, LocationError> {
        let (lat, lon) = raw
            .split_once(',')
            .ok_or_else(|| LocationError::PositionUnavailable(format!("expected lat,lon: {raw:?}")))?;

        let latitude: f64 = lat
            .trim()
            .parse()
            .map_err(|_| LocationError::PositionUnavailable(format!("bad latitude: {lat:?}")))?;
        let longitude: f64 = lon
            .trim()
            .parse()
            .map_err(|_| LocationError::PositionUnavailable(format!("bad longitude: {lon:?}")))?;

        let position = Coordinates::new(latitude, longitude);
        if !position.is_in_range() {
            return Err(LocationError::PositionUnavailable(format!(
                "coordinates out of range: {raw:?}"
            )));
        }

        Ok(position)
    }
}

impl PositioningProvider for ConfiguredPositioning {
    fn can_detect_location(&self) -> bool {
        self.raw.is_some()
    }

    async fn detect_location(&self) -> Result<Coordinates, LocationError> {
        let raw = self.raw.as_deref().ok_or(LocationError::Unsupported)?;

        let position = Self::parse_position(raw)?;
        debug!(
            "detected device position {:.4}, {:.4}",
            position.latitude, position.longitude
        );

        Ok(position)
    }
}
