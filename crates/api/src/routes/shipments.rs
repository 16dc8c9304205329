//! Shipment routes.
//!
//! Every handler acts on behalf of the signed-in user; ownership is enforced
//! by the shipment service.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use axum_extra::extract::WithRejection;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use shipsy_core::shipment::{Shipment, ShipmentFilter, ShipmentRequest, ShipmentSort};
use shipsy_shared::AppError;
use shipsy_shared::types::{DEFAULT_PAGE_SIZE, Page, PageRequest};

/// Creates the shipment routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shipments", post(add_shipment).get(list_shipments))
        .route("/shipments/filter", post(filter_shipments))
        .route(
            "/shipments/{id}",
            get(get_shipment)
                .put(update_shipment)
                .delete(delete_shipment),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Paging and ordering query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    /// Zero-based page index, default 0.
    pub page: Option<u64>,
    /// Page size, default 5.
    pub size: Option<u64>,
    /// Sort field name, default `shipmentDate`.
    pub sort_by: Option<String>,
    /// `asc` or `desc`, default `desc`.
    pub sort_dir: Option<String>,
}

impl PageParams {
    fn resolve(&self) -> Result<(ShipmentSort, PageRequest), ApiError> {
        let sort = ShipmentSort::from_query(self.sort_by.as_deref(), self.sort_dir.as_deref())?;
        let page = PageRequest::new(
            self.page.unwrap_or(0),
            self.size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .map_err(AppError::Validation)?;
        Ok((sort, page))
    }
}

/// Shipment as returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentResponse {
    /// Shipment id.
    pub id: i64,
    /// Title.
    pub shipment_title: String,
    /// Optional description.
    pub shipment_description: Option<String>,
    /// Category label.
    pub shipment_type: String,
    /// Delivery status.
    pub is_delivered: bool,
    /// Cost as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub cost: Decimal,
    /// Shipping date.
    pub shipment_date: NaiveDate,
}

impl From<Shipment> for ShipmentResponse {
    fn from(s: Shipment) -> Self {
        Self {
            id: s.id,
            shipment_title: s.title,
            shipment_description: s.description,
            shipment_type: s.shipment_type,
            is_delivered: s.delivered,
            cost: s.cost,
            shipment_date: s.shipment_date,
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /shipments - Create a shipment owned by the caller.
async fn add_shipment(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Json(payload), _): WithRejection<Json<ShipmentRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<ShipmentResponse>)> {
    let shipment = state
        .shipment_service()
        .add(auth.user_id(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(shipment.into())))
}

/// GET /shipments/{id} - Fetch one of the caller's shipments.
async fn get_shipment(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> ApiResult<Json<ShipmentResponse>> {
    let shipment = state.shipment_service().get(auth.user_id(), id).await?;
    Ok(Json(shipment.into()))
}

/// GET /shipments - Page through the caller's shipments.
async fn list_shipments(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Query(params), _): WithRejection<Query<PageParams>, ApiError>,
) -> ApiResult<Json<Page<ShipmentResponse>>> {
    let (sort, page) = params.resolve()?;
    let result = state
        .shipment_service()
        .list(auth.user_id(), sort, page)
        .await?;
    Ok(Json(result.map(ShipmentResponse::from)))
}

/// PUT /shipments/{id} - Replace one of the caller's shipments.
async fn update_shipment(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<ShipmentRequest>, ApiError>,
) -> ApiResult<Json<ShipmentResponse>> {
    let shipment = state
        .shipment_service()
        .update(auth.user_id(), id, payload)
        .await?;
    Ok(Json(shipment.into()))
}

/// DELETE /shipments/{id} - Remove one of the caller's shipments.
async fn delete_shipment(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> ApiResult<StatusCode> {
    state.shipment_service().delete(auth.user_id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /shipments/filter - Page through the caller's shipments matching a filter.
async fn filter_shipments(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Query(params), _): WithRejection<Query<PageParams>, ApiError>,
    WithRejection(Json(filter), _): WithRejection<Json<ShipmentFilter>, ApiError>,
) -> ApiResult<Json<Page<ShipmentResponse>>> {
    let (sort, page) = params.resolve()?;
    let result = state
        .shipment_service()
        .filter(auth.user_id(), &filter, sort, page)
        .await?;
    Ok(Json(result.map(ShipmentResponse::from)))
}
