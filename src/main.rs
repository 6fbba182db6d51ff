//! weatherdash - terminal weather dashboard

use std::cell::RefCell;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use tracing_subscriber::EnvFilter;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext,
};
use tui_dispatch_components::centered_rect;
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};
use weatherdash::action::Action;
use weatherdash::api::ForecastGateway;
use weatherdash::components::{
    Component, Palette, SearchOverlay, SearchOverlayProps, WeatherDisplay, WeatherDisplayProps,
};
use weatherdash::effect::Effect;
use weatherdash::geo::{FixedPosition, Geolocator, IpGeolocator};
use weatherdash::prefs::{FileStore, KeyValueStore, MemoryStore, PreferenceStore, StoreKeys};
use weatherdash::reducer::reducer;
use weatherdash::state::{AppState, Coordinates, SPINNER_TICK_MS};
use weatherdash::tasks;

const APP_DIR: &str = "weatherdash";
const LOG_FILE: &str = "weatherdash.log";

/// Current conditions and forecast for your location or any city
#[derive(Parser, Debug)]
#[command(name = "weatherdash")]
#[command(about = "Current conditions and forecast for your location or any city")]
struct Args {
    /// Fixed latitude to use instead of IP geolocation
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Fixed longitude to use instead of IP geolocation
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Disable geolocation; the dashboard waits for a search
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    no_locate: bool,

    /// Directory for preferences and the log file
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Keep preferences in memory only
    #[arg(long)]
    no_persist: bool,

    /// Log file path (defaults to <data-dir>/weatherdash.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum WeatherComponentId {
    Display,
    Search,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum WeatherContext {
    Main,
    Search,
}

impl EventRoutingState<WeatherComponentId, WeatherContext> for AppState {
    fn focused(&self) -> Option<WeatherComponentId> {
        if self.search_mode {
            Some(WeatherComponentId::Search)
        } else {
            Some(WeatherComponentId::Display)
        }
    }

    fn modal(&self) -> Option<WeatherComponentId> {
        if self.search_mode {
            Some(WeatherComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: WeatherComponentId) -> WeatherContext {
        match id {
            WeatherComponentId::Display => WeatherContext::Main,
            WeatherComponentId::Search => WeatherContext::Search,
        }
    }

    fn default_context(&self) -> WeatherContext {
        WeatherContext::Main
    }
}

/// Shared handles used by effect handlers
struct Services {
    gateway: Arc<ForecastGateway>,
    geolocator: Option<Arc<dyn Geolocator>>,
    prefs: Arc<PreferenceStore<Box<dyn KeyValueStore>>>,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();

    let data_dir = args
        .data_dir
        .clone()
        .or_else(|| dirs_next::data_local_dir().map(|dir| dir.join(APP_DIR)))
        .unwrap_or_else(|| PathBuf::from("."));
    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(|| data_dir.join(LOG_FILE));
    if let Err(e) = init_logging(&log_path) {
        eprintln!("Logging disabled ({}): {}", log_path.display(), e);
    }

    let prefs = Arc::new(preference_store(&args, &data_dir));
    let services = Services {
        gateway: Arc::new(ForecastGateway::new().map_err(io::Error::other)?),
        geolocator: geolocator(&args),
        prefs: Arc::clone(&prefs),
    };

    let debug = DebugSession::new(args.debug);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let initial = prefs.load();
    tracing::info!(
        units = initial.units.as_str(),
        theme = initial.theme.as_str(),
        saved = initial.saved_locations.len(),
        "Loaded preferences"
    );
    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(initial))
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions, services).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

/// Route tracing output to a file; the terminal belongs to the UI.
fn init_logging(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| io::Error::other(e.to_string()))
}

fn preference_store(args: &Args, data_dir: &Path) -> PreferenceStore<Box<dyn KeyValueStore>> {
    let store: Box<dyn KeyValueStore> = if args.no_persist {
        Box::new(MemoryStore::new())
    } else {
        let file = FileStore::in_dir(data_dir);
        tracing::info!(path = %file.path().display(), "Using preference file");
        Box::new(file)
    };
    PreferenceStore::new(store, StoreKeys::default())
}

fn geolocator(args: &Args) -> Option<Arc<dyn Geolocator>> {
    if args.no_locate {
        return None;
    }
    match (args.lat, args.lon) {
        (Some(latitude), Some(longitude)) => Some(Arc::new(FixedPosition(Coordinates {
            latitude,
            longitude,
        }))),
        _ => Some(Arc::new(IpGeolocator::default())),
    }
}

struct WeatherUi {
    display: WeatherDisplay,
    search: SearchOverlay,
}

impl WeatherUi {
    fn new() -> Self {
        Self {
            display: WeatherDisplay,
            search: SearchOverlay::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<WeatherComponentId>,
    ) {
        event_ctx.set_component_area(WeatherComponentId::Display, area);

        let props = WeatherDisplayProps {
            state,
            is_focused: render_ctx.is_focused() && !state.search_mode,
        };
        self.display.render(frame, area, props);

        self.search.set_open(state.search_mode);
        if state.search_mode {
            let modal_area = centered_rect(60, 7, area);
            event_ctx.set_component_area(WeatherComponentId::Search, modal_area);
            let props = SearchOverlayProps {
                query: &state.search_query,
                is_focused: render_ctx.is_focused(),
                palette: Palette::for_theme(state.theme),
                on_query_change: Action::SearchQueryChange,
                on_query_submit: Action::SearchSubmit,
            };
            self.search.render(frame, area, props);
        } else {
            event_ctx
                .component_areas
                .remove(&WeatherComponentId::Search);
        }
    }

    fn handle_display_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = WeatherDisplayProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self
            .display
            .handle_event(event, props)
            .into_iter()
            .collect();
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }

    fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        self.search.set_open(state.search_mode);
        let props = SearchOverlayProps {
            query: &state.search_query,
            is_focused: true,
            palette: Palette::for_theme(state.theme),
            on_query_change: Action::SearchQueryChange,
            on_query_submit: Action::SearchSubmit,
        };
        let actions: Vec<_> = self.search.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    services: Services,
) -> io::Result<DebugRunOutput<AppState>> {
    let services = Arc::new(services);
    let ui = Rc::new(RefCell::new(WeatherUi::new()));
    let mut bus: EventBus<AppState, Action, WeatherComponentId, WeatherContext> = EventBus::new();
    let keybindings: Keybindings<WeatherContext> = Keybindings::new();

    let ui_display = Rc::clone(&ui);
    bus.register(WeatherComponentId::Display, move |event, state| {
        ui_display
            .borrow_mut()
            .handle_display_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(WeatherComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::GeoLocate),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(SPINNER_TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, Arc::clone(&services)),
        )
        .await
}

/// Handle effects: network work is spawned, preference writes run inline.
///
/// Both forecast chains share one task key, so a newer request cancels the
/// one still in flight and only the latest result reaches the reducer.
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, services: Arc<Services>) {
    match effect {
        Effect::LocateDevice => {
            let Some(geolocator) = services.geolocator.clone() else {
                tracing::debug!("Geolocation disabled");
                return;
            };
            ctx.tasks().spawn("locate", async move {
                tasks::locate_device(geolocator.as_ref()).await
            });
        }
        Effect::FetchForecast { coords, units } => {
            let gateway = Arc::clone(&services.gateway);
            ctx.tasks().spawn("forecast", async move {
                tasks::load_forecast(&gateway, coords, units).await
            });
        }
        Effect::SearchForecast { query, units } => {
            let gateway = Arc::clone(&services.gateway);
            ctx.tasks().spawn("forecast", async move {
                tasks::search_forecast(&gateway, &query, units).await
            });
        }
        Effect::SaveUnits(units) => services.prefs.save_units(units),
        Effect::SaveTheme(theme) => services.prefs.save_theme(theme),
        Effect::SaveLocations(locations) => services.prefs.save_saved_locations(&locations),
    }
}
