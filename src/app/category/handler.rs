//! 分类处理器

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use validator::Validate;

use super::model::{Category, CreateCategoryRequest};
use crate::app::AppState;
use crate::core::error::CoreError;
use crate::core::response::{ApiResponse, DeleteSummary};

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Category>>>, CoreError> {
    let categories = state.category_service.list_categories()?;
    Ok(Json(ApiResponse::success(categories)))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Category>>), CoreError> {
    payload.validate()?;
    let category = state.category_service.create_category(&payload.name)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(category))))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ApiResponse<DeleteSummary>>, CoreError> {
    let category = state.category_service.delete_category(id)?;
    Ok(Json(ApiResponse::success(DeleteSummary {
        id,
        message: format!("分类 '{}' 已删除", category.name),
        name: category.name,
        cascaded: 0,
    })))
}
