use crate::app::AppState;
use crate::errors::ApiResult;
use crate::models::{ChildOrderResponse, OrderRequest, Side};
use axum::{Json, extract::State};

pub async fn buy_order(
    State(state): State<AppState>,
    Json(request): Json<OrderRequest>,
) -> ApiResult<ChildOrderResponse> {
    place_order(&state, &request, Side::Buy).await
}

pub async fn sell_order(
    State(state): State<AppState>,
    Json(request): Json<OrderRequest>,
) -> ApiResult<ChildOrderResponse> {
    place_order(&state, &request, Side::Sell).await
}

async fn place_order(
    state: &AppState,
    request: &OrderRequest,
    side: Side,
) -> ApiResult<ChildOrderResponse> {
    let order = request.to_child_order(side)?;

    let response = state
        .exchange
        .send_child_order(&order, request.is_dry)
        .await?;
    Ok(Json(response))
}
