//! Point-of-interest endpoints.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;
use tracing::info;

use super::{ApiError, AppState};
use crate::models::{Category, CategoryOption, PoiPayload, PoiStats, PoiView};
use crate::search::{RadiusParams, RadiusSearchResponse};

type ApiResult<T> = Result<T, ApiError>;

const LIST_CACHE_KEY: &str = "pois:list";

/// List every record, no distance annotation
pub async fn list_pois(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<PoiView>>> {
    let load = {
        let state = Arc::clone(&state);
        move || async move {
            let store = Arc::clone(&state.store);
            state
                .blocking(move || {
                    Ok(store
                        .list()?
                        .iter()
                        .map(|record| record.to_view())
                        .collect::<Vec<_>>())
                })
                .await
        }
    };

    let views = match &state.list_cache {
        Some(cache) => cache.get_or_try_insert_with(LIST_CACHE_KEY, load).await?,
        None => load().await?,
    };
    Ok(Json(views))
}

pub async fn create_poi(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PoiPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PoiView>)> {
    let Json(payload) = payload?;
    let draft = payload.into_draft()?;

    let store = Arc::clone(&state.store);
    let record = state.blocking(move || store.insert(draft)).await?;
    info!("Created {} with id {}", record, record.id);

    Ok((StatusCode::CREATED, Json(record.to_view())))
}

pub async fn retrieve_poi(
    State(state): State<Arc<AppState>>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<PoiView>> {
    let Path(id) = id?;
    let store = Arc::clone(&state.store);
    let record = state.blocking(move || store.get(id)).await?;
    Ok(Json(record.to_view()))
}

/// Full update of every writable field
pub async fn update_poi(
    State(state): State<Arc<AppState>>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<PoiPayload>, JsonRejection>,
) -> ApiResult<Json<PoiView>> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let draft = payload.into_draft()?;

    let store = Arc::clone(&state.store);
    let record = state.blocking(move || store.update(id, draft)).await?;
    Ok(Json(record.to_view()))
}

pub async fn delete_poi(
    State(state): State<Arc<AppState>>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    let store = Arc::clone(&state.store);
    state.blocking(move || store.delete(id)).await?;
    info!("Deleted point of interest {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Radius search around `lat`/`lng`
pub async fn radius_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RadiusParams>,
) -> ApiResult<Json<RadiusSearchResponse>> {
    let query = params.validate()?;

    let run = {
        let state = Arc::clone(&state);
        let query = query.clone();
        move || async move {
            let search = state.search.clone();
            state.blocking(move || search.execute(&query)).await
        }
    };

    let response = match &state.radius_cache {
        Some(cache) => cache.get_or_try_insert_with(&query.cache_key(), run).await?,
        None => run().await?,
    };
    Ok(Json(response))
}

#[derive(Serialize)]
pub struct CategoriesResponse {
    categories: Vec<CategoryOption>,
}

pub async fn categories() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: Category::all().iter().copied().map(CategoryOption::from).collect(),
    })
}

pub async fn stats(State(state): State<Arc<AppState>>) -> ApiResult<Json<PoiStats>> {
    let store = Arc::clone(&state.store);
    let stats = state.blocking(move || store.stats()).await?;
    Ok(Json(stats))
}
