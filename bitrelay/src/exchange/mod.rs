pub mod bitflyer;

use crate::errors::AppResult;
use crate::models::{ChildOrder, ChildOrderResponse, ProductCode, Ticker};
use async_trait::async_trait;

pub use bitflyer::BitFlyer;

#[async_trait]
pub trait ExchangeApi: Send + Sync {
    async fn get_ticker(&self, product_code: ProductCode) -> AppResult<Ticker>;

    /// Places a child order. With `is_dry` set nothing is sent and an empty
    /// acceptance is returned.
    async fn send_child_order(
        &self,
        order: &ChildOrder,
        is_dry: bool,
    ) -> AppResult<ChildOrderResponse>;
}
