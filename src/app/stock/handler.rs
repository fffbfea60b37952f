//! 库存处理器

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

use super::model::{CreatePurchaseRequest, CreateSaleRequest, Purchase, Sale, StockEntry};
use crate::app::category::model::CategoryQuery;
use crate::app::AppState;
use crate::core::error::CoreError;
use crate::core::response::{ApiResponse, DeleteSummary};

pub async fn record_purchase(
    State(state): State<AppState>,
    Json(payload): Json<CreatePurchaseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Purchase>>), CoreError> {
    let purchase = state.stock_service.record_purchase(payload)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(purchase))))
}

pub async fn delete_purchase(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ApiResponse<DeleteSummary>>, CoreError> {
    let purchase = state.stock_service.delete_purchase(id)?;
    Ok(Json(ApiResponse::success(DeleteSummary {
        id,
        name: format!("purchase-{}", purchase.id),
        message: format!("进货记录已删除，库存扣回 {}", purchase.quantity),
        cascaded: 0,
    })))
}

pub async fn record_sale(
    State(state): State<AppState>,
    Json(payload): Json<CreateSaleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Sale>>), CoreError> {
    let sale = state.stock_service.record_sale(payload)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(sale))))
}

pub async fn delete_sale(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ApiResponse<DeleteSummary>>, CoreError> {
    let sale = state.stock_service.delete_sale(id)?;
    Ok(Json(ApiResponse::success(DeleteSummary {
        id,
        name: format!("sale-{}", sale.id),
        message: format!("销售记录已删除，库存退回 {}", sale.quantity),
        cascaded: 0,
    })))
}

pub async fn opening_stock_register(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<ApiResponse<Vec<StockEntry>>>, CoreError> {
    let register = state
        .stock_service
        .opening_stock_register(query.requested())?;
    Ok(Json(ApiResponse::success(register)))
}
