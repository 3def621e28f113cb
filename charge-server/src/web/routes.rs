//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::browser::BrowseError;
use crate::directory::DirectoryError;
use crate::planner::{PlanError, PlanRequest};
use crate::stations::StationCacheError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations/nearby", get(nearby_stations))
        .route("/stations/:id", get(station_detail))
        .route("/routes/plan", post(plan_route))
        .route("/cache/stats", get(cache_stats))
        .route("/cache/invalidate", post(invalidate_cache))
        .route("/vehicles", get(search_vehicles))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Stations near a point, cache first with a live refresh.
async fn nearby_stations(
    State(state): State<AppState>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<BrowseResponse>, AppError> {
    let request = params.to_request()?;
    let result = state.browser.browse(&request).await?;
    Ok(Json(BrowseResponse::new(result, request.location.as_ref())))
}

/// A single station by numeric directory id.
async fn station_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StationResult>, AppError> {
    let station = state
        .directory
        .fetch_station(id)
        .await?
        .ok_or_else(|| AppError::NotFound {
            message: format!("No station with directory id {id}"),
        })?;

    Ok(Json(StationResult::new(station, None)))
}

/// Plan a route with charging stops.
async fn plan_route(
    State(state): State<AppState>,
    Json(body): Json<PlanRouteBody>,
) -> Result<Json<PlanRouteResponse>, AppError> {
    let vehicle = match (body.vehicle, &body.vehicle_id) {
        (Some(vehicle), _) => vehicle,
        (None, Some(id)) => state
            .vehicles
            .get(id)
            .map(|entry| entry.profile())
            .ok_or_else(|| AppError::NotFound {
                message: format!("Unknown vehicle: {id}"),
            })?,
        (None, None) => {
            return Err(AppError::BadRequest {
                message: "Either vehicle or vehicle_id is required".to_string(),
            });
        }
    };

    let mut request = PlanRequest::new(
        body.start,
        body.destination,
        body.destination_name.unwrap_or_else(|| "Destination".to_string()),
        vehicle,
        body.current_charge_percent,
    );
    if let Some(km) = body.safety_buffer_km {
        request = request.with_safety_buffer_km(km);
    }
    if let Some(prefer) = body.prefer_fast_charging {
        request = request.with_fast_charging_preference(prefer);
    }

    let route = state.planner.plan_route(&request).await?;
    Ok(Json(route.into()))
}

async fn cache_stats(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    Json(CacheStatsResponse {
        stations: state.cache.stats().await,
        directory_responses: state.browser.provider().entry_count(),
    })
}

/// Drop cached stations, all of them unless `stale_only` is set.
async fn invalidate_cache(
    State(state): State<AppState>,
    Query(params): Query<InvalidateParams>,
) -> Result<Json<InvalidateResponse>, AppError> {
    let removed = if params.stale_only.unwrap_or(false) {
        state.cache.invalidate_stale().await?
    } else {
        let total = state.cache.stats().await.total;
        state.cache.invalidate_all().await?;
        state.browser.provider().invalidate_all();
        total
    };

    Ok(Json(InvalidateResponse { removed }))
}

/// Search the vehicle catalog.
async fn search_vehicles(
    State(state): State<AppState>,
    Query(params): Query<VehicleSearchParams>,
) -> Json<VehicleSearchResponse> {
    let query = params.q.unwrap_or_default();
    let vehicles = state.vehicles.search(&query).into_iter().cloned().collect();
    Json(VehicleSearchResponse { vehicles })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    /// The station directory failed.
    Upstream { message: String },
    Internal { message: String },
}

impl From<DirectoryError> for AppError {
    fn from(e: DirectoryError) -> Self {
        AppError::Upstream {
            message: e.to_string(),
        }
    }
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::InvalidRequest(message) => AppError::BadRequest { message },
            PlanError::Directory(e) => e.into(),
        }
    }
}

impl From<BrowseError> for AppError {
    fn from(e: BrowseError) -> Self {
        match e {
            BrowseError::LocationUnavailable => AppError::BadRequest {
                message: e.to_string(),
            },
            BrowseError::Directory(e) => e.into(),
        }
    }
}

impl From<StationCacheError> for AppError {
    fn from(e: StationCacheError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "Request failed");
        } else {
            warn!(%status, %message, "Request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::Value;

    use super::*;
    use crate::cache::CacheConfig;
    use crate::directory::{DirectoryClient, DirectoryConfig};
    use crate::stations::{StationCache, StationCacheConfig};
    use crate::vehicles::VehicleCatalog;

    const DIRECTORY_BODY: &str = r#"[
        {
            "ID": 7,
            "UUID": "550e8400-e29b-41d4-a716-446655440000",
            "AddressInfo": { "Title": "Hub", "Latitude": 51.501, "Longitude": -0.1 },
            "Connections": [{ "ConnectionTypeID": 33 }],
            "StatusTypeID": 50
        }
    ]"#;

    const CATALOG: &str = r#"[{
        "id": "test-car",
        "brand": "Test",
        "model": "Car",
        "variant": "",
        "year": 2024,
        "batteryCapacityKwh": 75.0,
        "usableCapacityKwh": 70.0,
        "rangeKm": 400,
        "rangeMiles": 248,
        "maxDcChargingKw": 150,
        "connectorTypes": ["CCS"]
    }]"#;

    /// Serve a canned directory on an ephemeral port.
    async fn fake_directory(status: StatusCode, body: &'static str) -> String {
        let app = Router::new().route(
            "/poi",
            get(move || async move { (status, body).into_response() }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/poi")
    }

    /// Start the app against a directory at `directory_url`.
    async fn serve_app(directory_url: &str) -> String {
        let directory =
            DirectoryClient::new(DirectoryConfig::new(None).with_base_url(directory_url).with_timeout(5))
                .unwrap();
        let cache = Arc::new(StationCache::in_memory(StationCacheConfig::default()));
        let catalog = VehicleCatalog::from_json(CATALOG).unwrap();
        let state = AppState::new(directory, cache, catalog, &CacheConfig::default());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, create_router(state)).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn health_is_ok() {
        let app = serve_app(&fake_directory(StatusCode::OK, "[]").await).await;
        let body = reqwest::get(format!("{app}/health")).await.unwrap().text().await.unwrap();
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn nearby_returns_live_stations() {
        let app = serve_app(&fake_directory(StatusCode::OK, DIRECTORY_BODY).await).await;

        let response = reqwest::get(format!("{app}/stations/nearby?lat=51.5&lon=-0.1&sort=power"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json: Value = response.json().await.unwrap();
        assert_eq!(json["source"], "live");
        assert_eq!(json["offline"], false);
        assert_eq!(json["stations"][0]["name"], "Hub");
        assert_eq!(json["stations"][0]["max_power_kw"], 350);

        let stats: Value = reqwest::get(format!("{app}/cache/stats"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(stats["stations"]["total"], 1);
        assert_eq!(stats["stations"]["valid"], 1);
    }

    #[tokio::test]
    async fn nearby_without_location_is_bad_request() {
        let app = serve_app(&fake_directory(StatusCode::OK, "[]").await).await;

        let response = reqwest::get(format!("{app}/stations/nearby?lat=51.5")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json: Value = response.json().await.unwrap();
        assert_eq!(json["error"], "current location unavailable");
    }

    #[tokio::test]
    async fn directory_failure_without_cache_is_bad_gateway() {
        let app = serve_app(&fake_directory(StatusCode::INTERNAL_SERVER_ERROR, "boom").await).await;

        let response = reqwest::get(format!("{app}/stations/nearby?lat=51.5&lon=-0.1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn station_detail_found_and_missing() {
        let found = serve_app(&fake_directory(StatusCode::OK, DIRECTORY_BODY).await).await;
        let json: Value = reqwest::get(format!("{found}/stations/7"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(json["directory_id"], 7);

        let missing = serve_app(&fake_directory(StatusCode::OK, "[]").await).await;
        let response = reqwest::get(format!("{missing}/stations/7")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn plan_short_route_by_vehicle_id() {
        let app = serve_app(&fake_directory(StatusCode::OK, "[]").await).await;

        let body = serde_json::json!({
            "start": { "latitude": 51.5, "longitude": -0.1 },
            "destination": { "latitude": 51.75, "longitude": -1.25 },
            "destination_name": "Oxford",
            "vehicle_id": "test-car",
            "current_charge_percent": 90
        });
        let response = reqwest::Client::new()
            .post(format!("{app}/routes/plan"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json: Value = response.json().await.unwrap();
        assert_eq!(json["destination_name"], "Oxford");
        assert_eq!(json["stops"].as_array().unwrap().len(), 0);
        assert_eq!(json["completion"], "complete");
        assert_eq!(json["total_time_minutes"], json["drive_time_minutes"]);
    }

    #[tokio::test]
    async fn plan_rejects_unknown_vehicle_and_bad_charge() {
        let app = serve_app(&fake_directory(StatusCode::OK, "[]").await).await;
        let client = reqwest::Client::new();

        let unknown = serde_json::json!({
            "start": { "latitude": 51.5, "longitude": -0.1 },
            "destination": { "latitude": 52.0, "longitude": -0.1 },
            "vehicle_id": "nope",
            "current_charge_percent": 80
        });
        let response = client
            .post(format!("{app}/routes/plan"))
            .json(&unknown)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let overcharged = serde_json::json!({
            "start": { "latitude": 51.5, "longitude": -0.1 },
            "destination": { "latitude": 52.0, "longitude": -0.1 },
            "vehicle": {
                "usable_capacity_kwh": 70.0,
                "range_km": 400.0,
                "max_dc_charging_kw": 150.0,
                "connector_types": ["CCS"]
            },
            "current_charge_percent": 150
        });
        let response = client
            .post(format!("{app}/routes/plan"))
            .json(&overcharged)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invalidate_empties_cache() {
        let app = serve_app(&fake_directory(StatusCode::OK, DIRECTORY_BODY).await).await;
        reqwest::get(format!("{app}/stations/nearby?lat=51.5&lon=-0.1"))
            .await
            .unwrap();

        let client = reqwest::Client::new();
        let json: Value = client
            .post(format!("{app}/cache/invalidate?stale_only=true"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(json["removed"], 0);

        let json: Value = client
            .post(format!("{app}/cache/invalidate"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(json["removed"], 1);
    }

    #[tokio::test]
    async fn vehicles_search() {
        let app = serve_app(&fake_directory(StatusCode::OK, "[]").await).await;

        let json: Value = reqwest::get(format!("{app}/vehicles?q=car"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(json["vehicles"][0]["id"], "test-car");

        let json: Value = reqwest::get(format!("{app}/vehicles?q=truck"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(json["vehicles"].as_array().unwrap().len(), 0);
    }
}
