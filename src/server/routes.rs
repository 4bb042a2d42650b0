//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::coord::Coordinate;
use crate::eligibility::{evaluate, DeliveryVerdict};
use crate::error::{Error, ResolutionError};
use crate::record::Resolution;
use crate::resolver::ResolverState;
use crate::server::state::AppState;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let static_path = static_dir(&state.config.server.static_dir);

    Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/location", get(location_handler))
        .route("/api/location/resolve", post(resolve_handler))
        .route("/api/location/skip", post(skip_handler))
        .route("/api/location/state", get(state_handler))
        .route("/api/eligibility", post(eligibility_handler))
        .nest_service("/", ServeDir::new(static_path).append_index_html_on_directories(true))
        .with_state(state)
}

/// Find the static directory: as configured relative to cwd, else next to the executable
fn static_dir(configured: &str) -> PathBuf {
    let configured = PathBuf::from(configured);
    if configured.is_absolute() || configured.exists() {
        return configured;
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(&configured)))
        .filter(|path| path.exists())
        .unwrap_or(configured)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidCoordinates(_) => "INVALID_COORDINATES",
            Error::InvalidServiceArea(_) => "INVALID_SERVICE_AREA",
            Error::Config(_) => "CONFIG_ERROR",
            _ => "INTERNAL_ERROR",
        };
        ApiError {
            error: err.to_string(),
            code: code.to_string(),
        }
    }
}

impl From<ResolutionError> for ApiError {
    fn from(err: ResolutionError) -> Self {
        ApiError {
            code: err.kind.to_string().to_uppercase(),
            error: err.message,
        }
    }
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Service area shape ("radius" or "polygon")
    pub service_area: String,
    /// Current resolver state name
    pub state: String,
    /// Uptime in seconds
    pub uptime_secs: u64,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        service_area: state.resolver.service_area().shape().to_string(),
        state: state.resolver.state().name().to_string(),
        uptime_secs: state.uptime_secs(),
    })
}

/// Stored location response
#[derive(Debug, Serialize, Deserialize)]
pub struct LocationResponse {
    /// Last resolved location with a fresh verdict, if any
    pub location: Option<Resolution>,
    pub setup_skipped: bool,
}

async fn location_response(state: &AppState) -> LocationResponse {
    LocationResponse {
        location: state.resolver.last_known().await,
        setup_skipped: state.resolver.is_setup_skipped().await,
    }
}

/// Last known location endpoint
///
/// GET /api/location
async fn location_handler(State(state): State<Arc<AppState>>) -> Json<LocationResponse> {
    Json(location_response(&state).await)
}

/// Resolve endpoint, joining any attempt already running
///
/// POST /api/location/resolve
async fn resolve_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Resolution>, (StatusCode, Json<ApiError>)> {
    state
        .resolver
        .resolve()
        .await
        .map(Json)
        .map_err(|err| (StatusCode::UNPROCESSABLE_ENTITY, Json(ApiError::from(err))))
}

/// Skip setup endpoint
///
/// POST /api/location/skip
async fn skip_handler(State(state): State<Arc<AppState>>) -> Json<LocationResponse> {
    state.resolver.skip_setup().await;
    Json(location_response(&state).await)
}

/// Resolver state endpoint
///
/// GET /api/location/state
async fn state_handler(State(state): State<Arc<AppState>>) -> Json<ResolverState> {
    Json(state.resolver.state())
}

/// Eligibility request body
#[derive(Debug, Deserialize)]
pub struct EligibilityRequest {
    pub lat: f64,
    pub lng: f64,
}

/// Eligibility response
#[derive(Debug, Serialize, Deserialize)]
pub struct EligibilityResponse {
    pub coordinate: Coordinate,
    #[serde(flatten)]
    pub verdict: DeliveryVerdict,
}

/// Eligibility check endpoint
///
/// POST /api/eligibility
async fn eligibility_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EligibilityRequest>,
) -> Result<Json<EligibilityResponse>, ApiError> {
    let coordinate = Coordinate::try_new(req.lat, req.lng).map_err(ApiError::from)?;
    let verdict = evaluate(coordinate, state.resolver.service_area());

    Ok(Json(EligibilityResponse { coordinate, verdict }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::position::DevicePosition;
    use crate::record::ResolutionQuality;
    use crate::resolver::DeviceResolver;
    use crate::store::{FileLocationStore, LocationStore};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn create_test_state(position: DevicePosition) -> (Arc<AppState>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::default();
        let store = FileLocationStore::at(temp_dir.path().join("location.json"));
        let resolver = DeviceResolver::from_config(&config, position, store).unwrap();
        (Arc::new(AppState::with_resolver(config, resolver)), temp_dir)
    }

    fn bangalore() -> DevicePosition {
        DevicePosition::fixed(Coordinate::new(12.9716, 77.5946))
    }

    fn post(uri: &str, body: Body) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(body)
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let (state, _temp) = create_test_state(bangalore());
        let app = create_router(state);

        let response = app.oneshot(get("/api/status")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let status: StatusResponse = body_json(response).await;
        assert!(status.running);
        assert_eq!(status.service_area, "radius");
        assert_eq!(status.state, "idle");
    }

    #[tokio::test]
    async fn test_resolve_without_geocoder_is_degraded() {
        let (state, temp) = create_test_state(bangalore());
        let app = create_router(state.clone());

        let response = app
            .oneshot(post("/api/location/resolve", Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let resolution: Resolution = body_json(response).await;
        assert_eq!(resolution.record.resolution_quality, ResolutionQuality::Degraded);
        assert_eq!(resolution.record.formatted_address, "12.9716, 77.5946");
        assert!(resolution.verdict.within_service_area);

        let stored = FileLocationStore::at(temp.path().join("location.json")).load().unwrap();
        assert_eq!(stored.last_record, Some(resolution.record));
        assert_eq!(state.resolver.state().name(), "resolved");
    }

    #[tokio::test]
    async fn test_resolve_permission_denied() {
        let (state, _temp) = create_test_state(DevicePosition::Denied);
        let app = create_router(state);

        let response = app
            .oneshot(post("/api/location/resolve", Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn test_location_before_and_after_resolve() {
        let (state, _temp) = create_test_state(bangalore());

        let response = create_router(state.clone()).oneshot(get("/api/location")).await.unwrap();
        let before: LocationResponse = body_json(response).await;
        assert!(before.location.is_none());
        assert!(!before.setup_skipped);

        create_router(state.clone())
            .oneshot(post("/api/location/resolve", Body::empty()))
            .await
            .unwrap();

        let response = create_router(state).oneshot(get("/api/location")).await.unwrap();
        let after: LocationResponse = body_json(response).await;
        assert_eq!(
            after.location.unwrap().record.coordinate,
            Coordinate::new(12.9716, 77.5946)
        );
    }

    #[tokio::test]
    async fn test_skip_endpoint() {
        let (state, temp) = create_test_state(bangalore());
        let app = create_router(state);

        let response = app
            .oneshot(post("/api/location/skip", Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let location: LocationResponse = body_json(response).await;
        assert!(location.setup_skipped);

        let stored = FileLocationStore::at(temp.path().join("location.json")).load().unwrap();
        assert!(stored.setup_skipped);
    }

    #[tokio::test]
    async fn test_state_endpoint() {
        let (state, _temp) = create_test_state(bangalore());
        let app = create_router(state);

        let response = app.oneshot(get("/api/location/state")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = body_json(response).await;
        assert_eq!(json["state"], "idle");
    }

    #[tokio::test]
    async fn test_eligibility_endpoint() {
        let (state, _temp) = create_test_state(bangalore());

        let inside = serde_json::json!({ "lat": 12.98, "lng": 77.60 });
        let response = create_router(state.clone())
            .oneshot(post("/api/eligibility", Body::from(inside.to_string())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let verdict: EligibilityResponse = body_json(response).await;
        assert!(verdict.verdict.within_service_area);

        let outside = serde_json::json!({ "lat": 40.7128, "lng": -74.0060 });
        let response = create_router(state)
            .oneshot(post("/api/eligibility", Body::from(outside.to_string())))
            .await
            .unwrap();
        let verdict: EligibilityResponse = body_json(response).await;
        assert!(!verdict.verdict.within_service_area);
    }

    #[tokio::test]
    async fn test_eligibility_invalid_coordinates() {
        let (state, _temp) = create_test_state(bangalore());
        let app = create_router(state);

        let body = serde_json::json!({ "lat": 91.0, "lng": 0.0 });
        let response = app
            .oneshot(post("/api/eligibility", Body::from(body.to_string())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "INVALID_COORDINATES");
    }
}
