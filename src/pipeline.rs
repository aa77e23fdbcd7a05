//! The results pipeline for amenity-finder.
//!
//! Turns raw query results into the displayable list: fetch candidate
//! amenities from the query service, annotate each with its geodesic
//! distance from the search center, and sort ascending by that distance.
//! The output invariant is non-decreasing distance, with ties keeping the
//! order the service returned them in.

use anyhow::Result;
use log::warn;

use crate::geo::{Coordinates, distance_between};
use crate::overpass::{AmenityQuery, RawAmenity};

/// An amenity ready for display. `distance` is derived here, never
/// supplied by the query service.
#[derive(Debug, Clone, PartialEq)]
pub struct AmenityResult {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Geodesic distance from the search center, in meters
    pub distance: f64,
}

/// Annotates raw nodes with their distance from `center` and sorts them
/// nearest-first. A node whose coordinates are out of range cannot be
/// given a distance and is dropped with a warning.
pub fn annotate_and_sort(center: Coordinates, nodes: Vec<RawAmenity>) -> Vec<AmenityResult> {
    let mut results: Vec<AmenityResult> = nodes
        .into_iter()
        .filter_map(|node| {
            let position = Coordinates::new(node.latitude, node.longitude);
            match distance_between(center, position) {
                Ok(distance) => Some(AmenityResult {
                    id: node.id,
                    name: node.name.unwrap_or_default(),
                    latitude: node.latitude,
                    longitude: node.longitude,
                    distance,
                }),
                Err(err) => {
                    warn!("skipping amenity {}: {err}", node.id);
                    None
                }
            }
        })
        .collect();

    // sort_by is stable, so equal distances keep their input order
    results.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    results
}

/// Queries the service and returns the distance-sorted results,
/// propagating a query failure to the caller.
pub async fn query_sorted<Q: AmenityQuery>(
    query: &Q,
    center: Coordinates,
    radius: u32,
) -> Result<Vec<AmenityResult>> {
    let nodes = query
        .find_amenities(center.latitude, center.longitude, radius)
        .await?;

    Ok(annotate_and_sort(center, nodes))
}

/// Like [`query_sorted`], but absorbs a query failure at the pipeline
/// boundary: the failure is logged and an empty list is returned, so
/// nothing ever raises past here into a rendering path.
pub async fn fetch_sorted_results<Q: AmenityQuery>(
    query: &Q,
    center: Coordinates,
    radius: u32,
) -> Vec<AmenityResult> {
    match query_sorted(query, center, radius).await {
        Ok(results) => results,
        Err(err) => {
            warn!("amenity query failed: {err:#}");
            Vec::new()
        }
    }
}
