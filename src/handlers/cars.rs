use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{CreateCarRequest, PaginationQuery, UpdateCarRequest};
use crate::response::ApiResponse;
use crate::router::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cars", post(create_car).get(list_cars))
        .route(
            "/cars/{id}",
            get(get_car_by_id).put(update_car).delete(delete_car),
        )
}

/// Path ids are accepted as raw strings so a malformed id can produce
/// the same 400 a misshapen body would, rather than a routing failure.
fn parse_car_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest("Invalid car ID format".to_string()))
}

async fn create_car(
    State(state): State<AppState>,
    payload: Result<Json<CreateCarRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    let input = request.validate().map_err(AppError::Validation)?;
    let car = state.service.create_car(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Car created successfully", car)),
    ))
}

async fn get_car_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_car_id(&id)?;
    let car = state.service.get_car_by_id(id).await?;
    Ok(Json(ApiResponse::new("Car retrieved successfully", car)))
}

async fn list_cars(
    State(state): State<AppState>,
    query: Result<Query<PaginationQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(query) =
        query.map_err(|_| AppError::BadRequest("Invalid query parameters".to_string()))?;

    let errors = query.validate();
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let page = state.service.list_cars(&query).await?;
    Ok(Json(ApiResponse::new("Cars retrieved successfully", page)))
}

async fn update_car(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateCarRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_car_id(&id)?;
    let Json(request) = payload?;
    let update = request.validate().map_err(AppError::Validation)?;
    let car = state.service.update_car(id, update).await?;
    Ok(Json(ApiResponse::new("Car updated successfully", car)))
}

async fn delete_car(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_car_id(&id)?;
    state.service.delete_car(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
