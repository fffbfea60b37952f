//! 商品处理器

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

use super::model::{CreateProductRequest, Product, UpdateProductRequest};
use crate::app::category::model::CategoryQuery;
use crate::app::AppState;
use crate::core::error::CoreError;
use crate::core::response::{ApiResponse, DeleteSummary};

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<ApiResponse<Vec<Product>>>, CoreError> {
    let products = state.product_service.list_products(query.requested())?;
    Ok(Json(ApiResponse::success(products)))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ApiResponse<Product>>, CoreError> {
    let product = state.product_service.get_product(id)?;
    Ok(Json(ApiResponse::success(product)))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), CoreError> {
    let product = state.product_service.create_product(payload)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(product))))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<ApiResponse<Product>>, CoreError> {
    let product = state.product_service.update_product(id, payload)?;
    Ok(Json(ApiResponse::success(product)))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ApiResponse<DeleteSummary>>, CoreError> {
    let removal = state.product_service.delete_product(id)?;
    Ok(Json(ApiResponse::success(DeleteSummary {
        id,
        message: format!(
            "商品 '{}' 已删除，同时删除 {} 条进货记录、{} 条销售记录",
            removal.product.name, removal.purchases, removal.sales
        ),
        name: removal.product.name,
        cascaded: removal.purchases + removal.sales,
    })))
}
