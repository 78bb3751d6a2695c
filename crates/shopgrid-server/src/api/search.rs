use axum::{
    extract::{Query, State},
    Extension, Json,
};

use shopgrid_catalog::{RawQuery, SearchHit};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

/// `GET /api/v1/search?lat=&lng=&radius=&count=&tags=`
///
/// Validation failures come back as 400 with one message per offending
/// field; an out-of-coverage point is a successful empty result.
pub(super) async fn search_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(raw): Query<RawQuery>,
) -> Result<Json<ApiResponse<Vec<SearchHit>>>, ApiError> {
    let query = raw
        .validate()
        .map_err(|details| ApiError::validation(req_id.0.clone(), details))?;

    let hits = shopgrid_catalog::search(&state.catalog, &query);
    tracing::debug!(
        lat = query.lat,
        lng = query.lng,
        radius = query.radius,
        hits = hits.len(),
        "search served"
    );

    Ok(Json(ApiResponse {
        data: hits,
        meta: ResponseMeta::new(req_id.0),
    }))
}
