//! Overpass API client for amenity-finder.
//!
//! The Overpass API is the external query service that actually knows
//! where amenities are. This module defines the `AmenityQuery` trait as
//! the narrow interface the rest of the application consumes, and
//! `OverpassClient` as the real implementation that posts an Overpass QL
//! `node(around:)` query and decodes the JSON response.
//!
//! Radius enforcement is Overpass's job; callers receive whatever nodes
//! the service reports within the requested radius, in service order.

use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

/// A point of interest as reported by the query service. No distance yet;
/// that is derived later by the results pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAmenity {
    pub id: i64,
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Interface for amenity query services
#[allow(async_fn_in_trait)]
pub trait AmenityQuery {
    /// Returns the amenities within `radius` meters of the given center.
    /// Errors propagate to the caller as `Err`.
    async fn find_amenities(&self, lat: f64, lon: f64, radius: u32) -> Result<Vec<RawAmenity>>;
}

/// Decoded Overpass response envelope
#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    id: i64,
    lat: f64,
    lon: f64,
    #[serde(default)]
    tags: HashMap<String, String>,
}

impl OverpassElement {
    fn into_raw_amenity(self) -> RawAmenity {
        RawAmenity {
            id: self.id,
            name: self.tags.get("name").cloned(),
            latitude: self.lat,
            longitude: self.lon,
        }
    }
}

/// Queries the Overpass API over HTTP
pub struct OverpassClient {
    client: Client,
    endpoint: Url,
    amenity: String,
}

impl OverpassClient {
    /// Creates a client for the given Overpass endpoint, querying nodes
    /// with the given `amenity` tag value (e.g. `drinking_water`).
    pub fn new(endpoint: &str, amenity: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("Invalid Overpass endpoint URL: {endpoint}"))?;

        Ok(Self {
            client: Client::new(),
            endpoint,
            amenity: amenity.to_string(),
        })
    }

    fn build_query(&self, lat: f64, lon: f64, radius: u32) -> String {
        format!(
            r#"[out:json];node(around:{radius},{lat},{lon})["amenity"="{}"];out;"#,
            self.amenity
        )
    }
}

impl AmenityQuery for OverpassClient {
    async fn find_amenities(&self, lat: f64, lon: f64, radius: u32) -> Result<Vec<RawAmenity>> {
        let query = self.build_query(lat, lon, radius);
        debug!("posting Overpass query: {query}");

        let response = self
            .client
            .post(self.endpoint.clone())
            .body(query)
            .send()
            .await
            .with_context(|| format!("Failed to reach Overpass at {}", self.endpoint))?;

        if !response.status().is_success() {
            bail!("Overpass API returned {}", response.status());
        }

        let decoded: OverpassResponse = response
            .json()
            .await
            .context("Failed to decode Overpass response")?;

        debug!("Overpass returned {} nodes", decoded.elements.len());

        Ok(decoded
            .elements
            .into_iter()
            .map(OverpassElement::into_raw_amenity)
            .collect())
    }
}
