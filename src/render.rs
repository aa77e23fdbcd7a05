//! Console presentation for amenity-finder.
//!
//! The controller only knows the narrow `ScreenView` interface; this
//! module provides the terminal implementation of it.

use crate::controller::{AppState, ViewState};
use crate::pipeline::AmenityResult;

/// Outbound render surface. Called by the controller whenever the active
/// screen or the search parameters change.
pub trait ScreenView {
    fn render(&mut self, state: &AppState, results: &[AmenityResult]);
}

/// Renders a distance in meters the way a person reads it: meters below
/// one kilometer, kilometers with one decimal above.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{} m", meters.round() as i64)
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}

fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "—".to_string(), |v| v.to_string())
}

/// Prints each screen to stdout
pub struct ConsoleView;

impl ScreenView for ConsoleView {
    fn render(&mut self, state: &AppState, results: &[AmenityResult]) {
        match state.view {
            ViewState::Home => {
                println!("Home");
                println!("  Open /search to find amenities near a location.");
            }
            ViewState::Search => {
                println!("Search");
                println!("  Latitude:  {}", format_optional(state.params.latitude));
                println!("  Longitude: {}", format_optional(state.params.longitude));
                match state.params.radius {
                    Some(radius) => println!("  Radius:    {radius} m"),
                    None => println!("  Radius:    —"),
                }
            }
            ViewState::Results => {
                println!(
                    "Results for latitude {}, longitude {}, radius {}",
                    format_optional(state.params.latitude),
                    format_optional(state.params.longitude),
                    state
                        .params
                        .radius
                        .map_or_else(|| "—".to_string(), |r| format!("{r} m")),
                );
                println!("  {} amenities", results.len());
                for result in results {
                    // Unnamed nodes count toward the total but render no line
                    if result.name.is_empty() {
                        continue;
                    }
                    println!("  {}  {}", result.name, format_distance(result.distance));
                }
            }
        }
    }
}
