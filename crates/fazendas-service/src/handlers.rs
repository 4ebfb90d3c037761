//! Request handlers for the parcel endpoints.
//!
//! Every handler follows the same shape: log entry with key parameters,
//! validate, build and execute the store query, format the rows, log
//! completion with result counts. Validation failures are logged at warn and
//! returned with their reason; store failures are logged at error and
//! returned as opaque internal errors.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use tracing::{error, info, warn};

use fazendas_lib::{
    format_rows, validate_imovel_id, Page, ParcelQuery, ParcelRecord, SearchFilters, SearchMode,
};

use crate::metrics::{
    record_parcels_returned, record_rows_dropped, record_search_failed, record_search_performed,
};
use crate::middleware::extract_or_generate_request_id;
use crate::problem::{from_lib_error, ProblemDetails};
use crate::request::{PointSearchRequest, RadiusSearchRequest, Validate};
use crate::state::AppState;

/// Handle `GET /fazendas/{id}`.
pub async fn get_parcel(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<ParcelRecord>, ProblemDetails> {
    let request_id = extract_or_generate_request_id(&headers);
    info!(request_id = %request_id, id = %id, "handling parcel lookup");

    if let Err(e) = validate_imovel_id(&id) {
        record_search_failed("validation_error", "by_id");
        return Err(from_lib_error(&e, request_id.as_str()));
    }

    let query = ParcelQuery::build(
        &SearchMode::ById(id.clone()),
        &SearchFilters::default(),
        Page::default(),
    );
    let rows = fetch(&state, &query, request_id.as_str())?;

    if rows.is_empty() {
        warn!(request_id = %request_id, id = %id, "parcel not found");
        record_search_failed("not_found", "by_id");
        return Err(ProblemDetails::parcel_not_found(&id, request_id.as_str()));
    }

    let batch = format_rows(rows);
    if batch.dropped > 0 {
        record_rows_dropped(batch.dropped, "by_id");
    }

    // The single matching row had malformed geometry: the record cannot be
    // returned, and the absence is a data problem rather than a miss.
    let Some(record) = batch.records.into_iter().next() else {
        error!(request_id = %request_id, id = %id, "parcel row dropped due to malformed geometry");
        record_search_failed("store_error", "by_id");
        return Err(ProblemDetails::internal_error(request_id.as_str()));
    };

    record_search_performed("by_id");
    info!(request_id = %request_id, id = %id, "parcel lookup completed");
    Ok(Json(record))
}

/// Handle `POST /fazendas/busca-ponto`.
pub async fn search_containment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<PointSearchRequest>,
) -> Result<Json<Vec<ParcelRecord>>, ProblemDetails> {
    let request_id = extract_or_generate_request_id(&headers);
    info!(
        request_id = %request_id,
        latitude = request.latitude,
        longitude = request.longitude,
        page = request.page,
        size = request.size,
        "handling containment search"
    );

    if let Err(problem) = request.validate(request_id.as_str()) {
        warn!(request_id = %request_id, detail = ?problem.detail, "containment search rejected");
        record_search_failed("validation_error", "containment");
        return Err(*problem);
    }

    let mode = SearchMode::Containment {
        latitude: request.latitude,
        longitude: request.longitude,
    };
    run_search(&state, &mode, &request, request_id.as_str())
}

/// Handle `POST /fazendas/busca-raio`.
pub async fn search_proximity(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<RadiusSearchRequest>,
) -> Result<Json<Vec<ParcelRecord>>, ProblemDetails> {
    let request_id = extract_or_generate_request_id(&headers);
    info!(
        request_id = %request_id,
        latitude = request.base.latitude,
        longitude = request.base.longitude,
        radius_km = request.radius_km,
        page = request.base.page,
        size = request.base.size,
        "handling proximity search"
    );

    if let Err(problem) = request.validate(request_id.as_str()) {
        warn!(request_id = %request_id, detail = ?problem.detail, "proximity search rejected");
        record_search_failed("validation_error", "proximity");
        return Err(*problem);
    }

    let mode = SearchMode::Proximity {
        latitude: request.base.latitude,
        longitude: request.base.longitude,
        radius_km: request.radius_km,
    };
    run_search(&state, &mode, &request.base, request_id.as_str())
}

/// Shared search pipeline: query, fetch, format, log, respond.
///
/// An empty result set is a valid response, not an error.
fn run_search(
    state: &AppState,
    mode: &SearchMode,
    request: &PointSearchRequest,
    request_id: &str,
) -> Result<Json<Vec<ParcelRecord>>, ProblemDetails> {
    let query = ParcelQuery::build(mode, &request.filters(), request.page_window());
    let rows = fetch(state, &query, request_id)?;

    let batch = format_rows(rows);
    if batch.dropped > 0 {
        record_rows_dropped(batch.dropped, mode.label());
    }

    record_search_performed(mode.label());
    record_parcels_returned(batch.records.len(), mode.label());
    info!(
        request_id = %request_id,
        mode = mode.label(),
        count = batch.records.len(),
        dropped = batch.dropped,
        "search completed"
    );

    Ok(Json(batch.records))
}

/// Execute a shaped query against the store, collapsing failures to an
/// opaque internal error. The real cause is logged with the operation name.
fn fetch(
    state: &AppState,
    query: &ParcelQuery,
    request_id: &str,
) -> Result<Vec<fazendas_lib::RawParcelRow>, ProblemDetails> {
    state.store().fetch(query).map_err(|e| {
        error!(
            request_id = %request_id,
            mode = query.mode,
            error = %e,
            "spatial query execution failed"
        );
        record_search_failed("store_error", query.mode);
        ProblemDetails::internal_error(request_id)
    })
}
