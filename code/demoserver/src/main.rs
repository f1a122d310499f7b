//! The demoserver exposes the smart-farm dashboard state machine over http so
//! the simulator, controls, and advisory flow can be exercised locally
//! without any frontend.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use farmlib::advisory::{self, AdvisoryClient};
use farmlib::boards::{LogEntry, WelfarePost, system_logs, welfare_posts};
use farmlib::config::FarmConfig;
use farmlib::crops::{Crop, CropInfo, CropUpdate};
use farmlib::dashboard::{Dashboard, DashboardSnapshot};
use farmlib::simulator::Simulator;
use farmlib::store::InsightStore;
use farmlib::types::{CropSelect, DeviceToggleSet, PromptBody, SavedInsight, SensorHistory};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// Cadence of the telemetry simulator. The timer lives here, not in farmlib.
const TICK_INTERVAL: Duration = Duration::from_millis(2000);

const CONFIG_PATH: &str = "farm.toml";

#[derive(Clone)]
struct AppState {
    dashboard: Arc<Mutex<Dashboard>>,
    store: Arc<InsightStore>,
    model: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stderrlog::new()
        .module(module_path!())
        .verbosity(log::Level::Info)
        .init()?;

    let config = FarmConfig::load_or_default(std::path::Path::new(CONFIG_PATH))?;
    log::info!("Starting {} demoserver...", config.name());
    let store = InsightStore::new(config.insights_path());
    let insights = store.load();
    log::info!("Loaded {} saved insight(s)", insights.len());

    let state = AppState {
        dashboard: Arc::new(Mutex::new(Dashboard::new(
            Simulator::new(),
            &config,
            insights,
        ))),
        store: Arc::new(store),
        model: config.model().to_string(),
    };

    // The only autonomous activity: one recurring timer driving the
    // simulator. Ticks are strictly sequential.
    let ticker = state.dashboard.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        loop {
            interval.tick().await;
            ticker.lock().unwrap().tick();
        }
    });

    let app = Router::new()
        .route("/state", get(get_state))
        .route("/history", get(get_history))
        .route("/control", post(control))
        .route("/crops", get(list_crops))
        .route("/crops/{id}", post(update_crop))
        .route("/crop", get(get_crop).post(select_crop))
        .route("/prompt", get(get_prompt).post(set_prompt))
        .route("/analyze", post(analyze))
        .route("/insights", get(list_insights).post(save_insight))
        .route("/insights/{id}", delete(delete_insight))
        .route("/boards/welfare", get(welfare_board))
        .route("/boards/logs", get(logs_board))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    log::info!("Listening on port 3000");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn get_state(State(app): State<AppState>) -> Json<DashboardSnapshot> {
    Json(app.dashboard.lock().unwrap().snapshot())
}

async fn get_history(State(app): State<AppState>) -> Json<SensorHistory> {
    Json(app.dashboard.lock().unwrap().history().clone())
}

async fn control(State(app): State<AppState>, Json(cmd): Json<DeviceToggleSet>) -> StatusCode {
    log::info!("/control called with {cmd:?}");
    match app.dashboard.lock().unwrap().handle_toggle_cmd(&cmd) {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            log::error!("Error handling /control: {err:?}");
            StatusCode::BAD_REQUEST
        }
    }
}

async fn list_crops(State(app): State<AppState>) -> Json<Vec<Crop>> {
    Json(app.dashboard.lock().unwrap().crops().to_vec())
}

async fn get_crop(State(app): State<AppState>) -> Json<CropInfo> {
    Json(app.dashboard.lock().unwrap().crop_info())
}

async fn select_crop(State(app): State<AppState>, Json(body): Json<CropSelect>) -> StatusCode {
    log::info!("Selecting crop '{}'", body.name);
    app.dashboard.lock().unwrap().select_crop(&body.name);
    StatusCode::OK
}

async fn update_crop(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<CropUpdate>,
) -> StatusCode {
    log::info!("POST /crops/{id} called with {update:?}");
    match app.dashboard.lock().unwrap().update_crop_settings(&id, &update) {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            log::error!("Error handling /crops/{id}: {err:?}");
            StatusCode::BAD_REQUEST
        }
    }
}

async fn get_prompt(State(app): State<AppState>) -> Json<PromptBody> {
    Json(PromptBody {
        template: app.dashboard.lock().unwrap().prompt_template().to_string(),
    })
}

async fn set_prompt(State(app): State<AppState>, Json(body): Json<PromptBody>) -> StatusCode {
    app.dashboard.lock().unwrap().set_prompt_template(&body.template);
    StatusCode::OK
}

// Runs one advisory round trip: interpolate the prompt from current state,
// call the remote service, and deliver the outcome back to the dashboard.
// The mutex is never held across the remote call.
async fn analyze(State(app): State<AppState>) -> Json<DashboardSnapshot> {
    let prompt = app.dashboard.lock().unwrap().begin_analysis();

    let result = match advisory::api_key_from_env() {
        Ok(key) => AdvisoryClient::new(&app.model, key).generate(&prompt).await,
        Err(err) => Err(err),
    };

    let mut dashboard = app.dashboard.lock().unwrap();
    dashboard.finish_analysis(result);
    Json(dashboard.snapshot())
}

async fn list_insights(State(app): State<AppState>) -> Json<Vec<SavedInsight>> {
    Json(app.dashboard.lock().unwrap().insights().to_vec())
}

async fn save_insight(
    State(app): State<AppState>,
) -> Result<Json<SavedInsight>, (StatusCode, String)> {
    let mut dashboard = app.dashboard.lock().unwrap();
    let Some(insight) = dashboard.save_insight() else {
        return Err((
            StatusCode::BAD_REQUEST,
            "No advisory to save".to_string(),
        ));
    };
    if let Err(err) = app.store.save(dashboard.insights()) {
        log::error!("Failed to persist insights: {err:?}");
        return Err((StatusCode::INTERNAL_SERVER_ERROR, err.to_string()));
    }
    Ok(Json(insight))
}

async fn delete_insight(State(app): State<AppState>, Path(id): Path<String>) -> StatusCode {
    let mut dashboard = app.dashboard.lock().unwrap();
    if !dashboard.delete_insight(&id) {
        return StatusCode::NOT_FOUND;
    }
    if let Err(err) = app.store.save(dashboard.insights()) {
        log::error!("Failed to persist insights: {err:?}");
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    StatusCode::OK
}

async fn welfare_board() -> Json<Vec<WelfarePost>> {
    Json(welfare_posts())
}

async fn logs_board() -> Json<Vec<LogEntry>> {
    Json(system_logs())
}
