use crate::app::AppState;
use crate::errors::ApiResult;
use crate::models::{ProductCode, Ticker};
use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TickerQuery {
    #[serde(default)]
    pub product_code: String,
}

pub async fn get_ticker(
    State(state): State<AppState>,
    Query(query): Query<TickerQuery>,
) -> ApiResult<Ticker> {
    let product_code: ProductCode = query.product_code.parse()?;

    let ticker = state.exchange.get_ticker(product_code).await?;
    Ok(Json(ticker))
}
