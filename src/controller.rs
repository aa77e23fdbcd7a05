//! Navigation and state synchronization for amenity-finder.
//!
//! The controller keeps three things consistent: the address path
//! (shareable and bookmarkable), the in-memory search parameters, and the
//! active screen. The path is the single source of truth — user actions
//! rewrite the path, and every path change funnels back through
//! [`AppController::navigate`].
//!
//! State lives in an explicit [`AppState`] value and changes only through
//! the pure [`transition`] function, so the entire routing behavior is
//! unit-testable without a rendering environment. The controller follows
//! at most one redirect per navigation; the bound is an explicit counter,
//! not an accident of call order.

use log::{debug, error, info, warn};

use crate::geo::Coordinates;
use crate::overpass::AmenityQuery;
use crate::pipeline::{self, AmenityResult};
use crate::render::ScreenView;
use crate::routes::{Route, RouteContext, match_path};

/// The active screen. Exactly one at a time; transitions only happen
/// through the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Home,
    Search,
    Results,
}

impl ViewState {
    /// The unparameterized path that reaches this screen.
    pub fn base_path(&self) -> &'static str {
        match self {
            ViewState::Home => "/",
            ViewState::Search => "/search",
            ViewState::Results => "/results",
        }
    }
}

/// The current search parameters. All fields start empty; route matches
/// and user input fill them in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SearchParameters {
    /// Decimal degrees
    pub latitude: Option<f64>,
    /// Decimal degrees
    pub longitude: Option<f64>,
    /// Meters
    pub radius: Option<u32>,
}

impl SearchParameters {
    /// Whether the parameters are complete enough to execute a search:
    /// latitude, longitude, and a radius greater than zero.
    pub fn can_search(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some() && self.radius.unwrap_or(0) > 0
    }

    /// The parameterized path under `prefix`, or `None` while incomplete.
    fn to_path(self, prefix: &str) -> Option<String> {
        let (Some(lat), Some(lon), Some(radius)) = (self.latitude, self.longitude, self.radius)
        else {
            return None;
        };

        Some(format!("{prefix}/{lat}/{lon}/{radius}"))
    }
}

/// The application state owned by the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub view: ViewState,
    pub params: SearchParameters,
    /// True once a parameterized search route has been entered this
    /// session; never cleared. Governs whether bare `/search` and
    /// `/results` redirect to their parameterized forms.
    pub already_searched: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            view: ViewState::Home,
            params: SearchParameters::default(),
            already_searched: false,
        }
    }
}

/// What a route match means for the current state.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The state to settle on
    Settled(AppState),
    /// Navigate again, to this path
    Redirect(String),
    /// Malformed parameters; keep the current state untouched
    Ignored,
}

/// The pure state transition for a matched route.
pub fn transition(state: &AppState, route: &Route) -> Outcome {
    match route {
        Route::Home => Outcome::Settled(AppState {
            view: ViewState::Home,
            ..state.clone()
        }),
        Route::Search => {
            if state.already_searched {
                if let Some(path) = state.params.to_path("/search") {
                    return Outcome::Redirect(path);
                }
            }
            Outcome::Settled(AppState {
                view: ViewState::Search,
                ..state.clone()
            })
        }
        Route::SearchWith(ctx) => match extract_parameters(ctx) {
            Some(params) => Outcome::Settled(AppState {
                view: ViewState::Search,
                params,
                already_searched: true,
            }),
            None => Outcome::Ignored,
        },
        Route::Results => {
            if state.already_searched {
                if let Some(path) = state.params.to_path("/results") {
                    return Outcome::Redirect(path);
                }
            }
            Outcome::Redirect("/search".to_string())
        }
        Route::ResultsWith(ctx) => match extract_parameters(ctx) {
            Some(params) => Outcome::Settled(AppState {
                view: ViewState::Results,
                params,
                already_searched: true,
            }),
            None => Outcome::Ignored,
        },
    }
}

/// Validates a raw route parameter triple. Accepts it only when all three
/// segments are present, non-empty, numeric, and within range; anything
/// less is a deep link we tolerate silently.
fn extract_parameters(ctx: &RouteContext) -> Option<SearchParameters> {
    if ctx.lat.is_empty() || ctx.lon.is_empty() || ctx.radius.is_empty() {
        return None;
    }

    let latitude: f64 = ctx.lat.parse().ok()?;
    let longitude: f64 = ctx.lon.parse().ok()?;
    let radius: u32 = ctx.radius.parse().ok()?;

    if radius == 0 || !Coordinates::new(latitude, longitude).is_in_range() {
        return None;
    }

    Some(SearchParameters {
        latitude: Some(latitude),
        longitude: Some(longitude),
        radius: Some(radius),
    })
}

/// At most one internal redirect per navigation.
const MAX_REDIRECTS: usize = 1;

/// Coordinates the whole application: owns the state, applies route
/// transitions, runs the results pipeline when the results screen
/// activates, and re-renders the injected view whenever state changes.
pub struct AppController<Q, V> {
    state: AppState,
    results: Vec<AmenityResult>,
    query: Q,
    view: V,
}

impl<Q: AmenityQuery, V: ScreenView> AppController<Q, V> {
    pub fn new(query: Q, view: V) -> Self {
        Self {
            state: AppState::default(),
            results: Vec::new(),
            query,
            view,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn results(&self) -> &[AmenityResult] {
        &self.results
    }

    /// Navigates to a path: matches it against the route table, applies
    /// the transition, follows at most one redirect, fetches results when
    /// the parameterized results route settles, and re-renders.
    ///
    /// Unmatched paths and malformed parameter triples change nothing.
    pub async fn navigate(&mut self, path: &str) {
        let mut current = path.to_string();
        let mut redirects = 0;

        loop {
            let Some(route) = match_path(&current) else {
                debug!("no route matches {current:?}; keeping current state");
                return;
            };

            match transition(&self.state, &route) {
                Outcome::Ignored => {
                    debug!("malformed parameters in {current:?}; keeping current state");
                    return;
                }
                Outcome::Redirect(target) => {
                    if redirects >= MAX_REDIRECTS {
                        error!("refusing second redirect {current:?} -> {target:?}");
                        return;
                    }
                    debug!("redirecting {current:?} -> {target:?}");
                    redirects += 1;
                    current = target;
                }
                Outcome::Settled(next) => {
                    info!("navigated to {current:?} ({:?})", next.view);
                    self.state = next;

                    // One fetch per activation of the parameterized results
                    // route; re-fetching requires re-navigating here.
                    if matches!(route, Route::ResultsWith(_)) {
                        self.refresh_results().await;
                    }

                    self.view.render(&self.state, &self.results);
                    return;
                }
            }
        }
    }

    /// Manual navigation (app menu): equivalent to visiting the screen's
    /// base path.
    pub async fn request_navigation(&mut self, screen: ViewState) {
        self.navigate(screen.base_path()).await;
    }

    /// The search screen's "search" action: rewrites the address to the
    /// parameterized results path. This is the only way from the search
    /// screen into the results screen.
    pub async fn request_search(&mut self, params: SearchParameters) {
        if !params.can_search() {
            warn!("search requested with incomplete parameters; ignoring");
            return;
        }
        let Some(path) = params.to_path("/results") else {
            return;
        };

        self.navigate(&path).await;
    }

    /// The map's "center changed" event. Ignored unless both coordinates
    /// are present; the radius is untouched and no navigation happens.
    pub fn update_center(&mut self, latitude: Option<f64>, longitude: Option<f64>) {
        let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
            return;
        };

        self.state.params.latitude = Some(latitude);
        self.state.params.longitude = Some(longitude);
        self.view.render(&self.state, &self.results);
    }

    async fn refresh_results(&mut self) {
        let SearchParameters {
            latitude: Some(latitude),
            longitude: Some(longitude),
            radius: Some(radius),
        } = self.state.params
        else {
            warn!("results screen activated without complete parameters; skipping fetch");
            return;
        };

        let center = Coordinates::new(latitude, longitude);
        match pipeline::query_sorted(&self.query, center, radius).await {
            Ok(results) => self.results = results,
            // Absorb the failure here: the previous list (empty on a
            // first attempt) stays on screen.
            Err(err) => warn!("amenity query failed: {err:#}"),
        }
    }
}
