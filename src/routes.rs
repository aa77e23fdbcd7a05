//! The route table for amenity-finder.
//!
//! Paths are the application's primary external contract: every screen and
//! every search is reachable through a bookmarkable path. This module only
//! recognizes paths; deciding what a match *means* for the application
//! state happens in [`crate::controller`].
//!
//! | Path                         | Route                  |
//! |------------------------------|------------------------|
//! | `/`                          | `Home`                 |
//! | `/search`                    | `Search`               |
//! | `/search/:lat/:lon/:radius`  | `SearchWith(context)`  |
//! | `/results`                   | `Results`              |
//! | `/results/:lat/:lon/:radius` | `ResultsWith(context)` |
//!
//! Anything else is unmatched (`None`).

/// Raw path parameters captured by a parameterized route, before any
/// validation. Segments may be empty, e.g. for `/search/47.3/8.5/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteContext {
    pub lat: String,
    pub lon: String,
    pub radius: String,
}

/// A recognized path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Search,
    SearchWith(RouteContext),
    Results,
    ResultsWith(RouteContext),
}

/// Matches a path against the route table. Returns `None` for paths the
/// table does not know, including parameterized paths with the wrong
/// number of segments (`/search/47.3`).
pub fn match_path(path: &str) -> Option<Route> {
    let rest = path.strip_prefix('/')?;

    if rest.is_empty() {
        return Some(Route::Home);
    }

    let segments: Vec<&str> = rest.split('/').collect();
    match segments.as_slice() {
        ["search"] => Some(Route::Search),
        ["search", lat, lon, radius] => Some(Route::SearchWith(RouteContext {
            lat: (*lat).to_string(),
            lon: (*lon).to_string(),
            radius: (*radius).to_string(),
        })),
        ["results"] => Some(Route::Results),
        ["results", lat, lon, radius] => Some(Route::ResultsWith(RouteContext {
            lat: (*lat).to_string(),
            lon: (*lon).to_string(),
            radius: (*radius).to_string(),
        })),
        _ => None,
    }
}
