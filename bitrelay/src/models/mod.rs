mod order;
mod product_code;
mod ticker;

pub use order::{
    ChildOrder, ChildOrderResponse, ChildOrderType, MAX_MINUTE_TO_EXPIRE, MIN_MINUTE_TO_EXPIRE,
    OrderRequest, Side, TimeInForce,
};
pub use product_code::ProductCode;
pub use ticker::{NewTicker, StoredTicker, Ticker, convert_ticker_from_source};
