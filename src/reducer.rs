//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{display_label, AppState, MY_LOCATION, NO_MATCH_MESSAGE};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Geo actions =====
        Action::GeoLocate => DispatchResult::effect(Effect::LocateDevice),

        Action::GeoDidLocate(coords) => {
            begin_loading(state);
            DispatchResult::changed_with(Effect::FetchForecast {
                coords,
                units: state.units,
            })
        }

        // Denial is logged where it happens; the view stays idle.
        Action::GeoDidFail(_) => DispatchResult::unchanged(),

        // ===== Forecast actions =====
        Action::ForecastDidLoad(forecast) => {
            state.forecast = Some(forecast);
            state.location_label = MY_LOCATION.to_string();
            state.loading = false;
            DispatchResult::changed()
        }

        Action::ForecastDidError(msg) => {
            state.error = Some(msg);
            state.loading = false;
            DispatchResult::changed()
        }

        // ===== Search actions =====
        Action::SearchOpen => {
            state.search_mode = true;
            state.search_query.clear();
            DispatchResult::changed()
        }

        Action::SearchClose => {
            state.search_mode = false;
            state.search_query.clear();
            DispatchResult::changed()
        }

        Action::SearchQueryChange(query) => {
            state.search_query = query;
            DispatchResult::changed()
        }

        Action::SearchSubmit(query) => submit_search(state, &query),

        Action::SearchDidLoad { place, forecast } => {
            state.forecast = Some(forecast);
            state.location_label = display_label(&place.label);
            state.loading = false;
            DispatchResult::changed()
        }

        Action::SearchDidMiss => {
            state.error = Some(NO_MATCH_MESSAGE.to_string());
            state.loading = false;
            DispatchResult::changed()
        }

        // ===== Saved actions =====
        Action::SavedAdd => {
            if state.location_label.is_empty() {
                return DispatchResult::unchanged();
            }
            let mut next = Vec::with_capacity(state.saved_locations.len() + 1);
            next.push(state.location_label.clone());
            for label in state.saved_locations.drain(..) {
                if !next.contains(&label) {
                    next.push(label);
                }
            }
            state.saved_locations = next;
            state.saved_selected = 0;
            DispatchResult::changed_with(Effect::SaveLocations(state.saved_locations.clone()))
        }

        Action::SavedRemove(label) => {
            let before = state.saved_locations.len();
            state.saved_locations.retain(|saved| *saved != label);
            if state.saved_locations.len() == before {
                return DispatchResult::unchanged();
            }
            state.saved_selected = state
                .saved_selected
                .min(state.saved_locations.len().saturating_sub(1));
            DispatchResult::changed_with(Effect::SaveLocations(state.saved_locations.clone()))
        }

        Action::SavedSelect(index) => {
            if index < state.saved_locations.len() && index != state.saved_selected {
                state.saved_selected = index;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::SavedOpen => {
            let Some(label) = state.selected_saved().map(str::to_string) else {
                return DispatchResult::unchanged();
            };
            submit_search(state, &label)
        }

        // ===== UI actions =====
        Action::UiToggleUnits => {
            state.units = state.units.toggle();
            // Re-run the mount-time flow rather than reusing coordinates.
            DispatchResult::changed_with_many(vec![
                Effect::SaveUnits(state.units),
                Effect::LocateDevice,
            ])
        }

        Action::UiToggleTheme => {
            state.theme = state.theme.toggle();
            DispatchResult::changed_with(Effect::SaveTheme(state.theme))
        }

        Action::UiSelectTab(tab) => {
            if state.active_tab == tab {
                DispatchResult::unchanged()
            } else {
                state.active_tab = tab;
                DispatchResult::changed()
            }
        }

        Action::UiToggleTab => {
            state.active_tab = state.active_tab.toggle();
            DispatchResult::changed()
        }

        Action::Render => DispatchResult::changed(),

        // ===== Global actions =====
        Action::Tick => {
            if state.loading {
                state.tick_count = state.tick_count.wrapping_add(1);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn begin_loading(state: &mut AppState) {
    state.loading = true;
    state.error = None;
    state.tick_count = 0;
}

fn submit_search(state: &mut AppState, query: &str) -> DispatchResult<Effect> {
    let query = query.trim();
    if query.is_empty() {
        return DispatchResult::unchanged();
    }
    begin_loading(state);
    state.search_mode = false;
    state.search_query = query.to_string();
    DispatchResult::changed_with(Effect::SearchForecast {
        query: query.to_string(),
        units: state.units,
    })
}
