//! Color intelligence API handlers
//!
//! GET /colors/search, GET /colors/explain, POST /colors/simulate-replace
//!
//! All three are synchronous reads: they load the engine's working set
//! (active palettes + curated graph), run the pure engine functions and
//! answer inline.

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    color::{engine, harmony, normalize_hex},
    db,
    error::{ApiError, ApiResult},
    models::PaletteItem,
    AppState,
};

/// GET /colors/search query parameters
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub hex: Option<String>,
    pub limit: Option<usize>,
}

/// One related outfit in the search response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedCode {
    pub id: String,
    pub illustration_url: String,
    pub palette: Vec<PaletteItem>,
    pub likes: i64,
}

/// GET /colors/search response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub search_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_name: Option<String>,
    pub near_colors: Vec<String>,
    pub match_colors: Vec<String>,
    pub related_codes: Vec<RelatedCode>,
}

/// GET /colors/explain query parameters
#[derive(Debug, Deserialize)]
pub struct ExplainParams {
    pub base: Option<String>,
    #[serde(rename = "match")]
    pub matched: Option<String>,
}

/// POST /colors/simulate-replace request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateReplaceRequest {
    pub code_id: String,
    pub original_color: String,
    pub new_color: String,
}

/// POST /colors/simulate-replace response (preview only, nothing persisted)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateReplaceResponse {
    pub original_palette: Vec<PaletteItem>,
    pub new_palette: Vec<PaletteItem>,
}

/// Default and maximum result counts for search
const DEFAULT_SEARCH_LIMIT: usize = 10;

/// GET /colors/search?hex=RRGGBB&limit=N
pub async fn search_colors(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SearchResponse>> {
    let hex = params
        .hex
        .ok_or_else(|| ApiError::BadRequest("hex parameter is required".to_string()))?;
    let search_color = normalize_hex(&hex)?;

    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT).min(engine::MAX_RESULTS);

    let codes = db::codes::load_active_palettes(&state.db).await?;
    let pairs = db::color_pairs::load_all(&state.db).await?;

    let near_colors = engine::find_similar_colors(&search_color, &codes, &pairs, limit)?;
    let match_colors = engine::find_matching_colors(&search_color, &pairs, &codes, limit)?;

    let related_ids =
        engine::find_codes_by_color(&search_color, &codes, engine::RELATED_CODE_DISTANCE)?;
    let related_codes = db::codes::get_codes_by_ids(&state.db, &related_ids)
        .await?
        .into_iter()
        .map(|code| RelatedCode {
            id: code.id,
            illustration_url: code.illustration_url,
            palette: code.palette,
            likes: code.likes,
        })
        .collect();

    let color_name = engine::color_name(&search_color)?.map(str::to_string);

    tracing::debug!(search_color = %search_color, "Color search");

    Ok(Json(SearchResponse {
        search_color,
        color_name,
        near_colors,
        match_colors,
        related_codes,
    }))
}

/// GET /colors/explain?base=RRGGBB&match=RRGGBB
pub async fn explain_colors(
    Query(params): Query<ExplainParams>,
) -> ApiResult<Json<harmony::PairExplanation>> {
    let base = params
        .base
        .ok_or_else(|| ApiError::BadRequest("base and match parameters are required".to_string()))?;
    let matched = params
        .matched
        .ok_or_else(|| ApiError::BadRequest("base and match parameters are required".to_string()))?;

    let base = normalize_hex(&base)?;
    let matched = normalize_hex(&matched)?;

    let explanation = harmony::explain_pair(&base, &matched)?;
    Ok(Json(explanation))
}

/// POST /colors/simulate-replace
///
/// Substitutes one palette color with another and returns the result as a
/// preview; the stored outfit is untouched.
pub async fn simulate_replace(
    State(state): State<AppState>,
    Json(request): Json<SimulateReplaceRequest>,
) -> ApiResult<Json<SimulateReplaceResponse>> {
    let original_color = normalize_hex(&request.original_color)?;
    let new_color = normalize_hex(&request.new_color)?;
    let new_rgb = crate::color::hex_to_rgb(&new_color)?;

    let code = db::codes::get_code(&state.db, &request.code_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Outfit not found: {}", request.code_id)))?;

    let new_palette: Vec<PaletteItem> = code
        .palette
        .iter()
        .map(|item| {
            let matches = normalize_hex(&item.hex)
                .map(|hex| hex == original_color)
                .unwrap_or(false);
            if matches {
                PaletteItem {
                    hex: new_color.clone(),
                    rgb: item.rgb.map(|_| new_rgb.into()),
                    ..item.clone()
                }
            } else {
                item.clone()
            }
        })
        .collect();

    Ok(Json(SimulateReplaceResponse {
        original_palette: code.palette,
        new_palette,
    }))
}

/// Build color routes
pub fn color_routes() -> Router<AppState> {
    Router::new()
        .route("/colors/search", get(search_colors))
        .route("/colors/explain", get(explain_colors))
        .route("/colors/simulate-replace", post(simulate_replace))
}
