use serde::{Deserialize, Serialize};

/// A price snapshot as served by the exchange and relayed by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub tick_id: i64,
    pub product_code: String,
    pub state: String,
    pub timestamp: String,
    pub best_bid: f64,
    pub best_ask: f64,
    pub best_bid_size: f64,
    pub best_ask_size: f64,
    pub total_bid_depth: f64,
    pub total_ask_depth: f64,
    pub market_bid_size: f64,
    pub market_ask_size: f64,
    pub ltp: f64,
    pub volume: f64,
    pub volume_by_product: f64,
}

/// The insert shape accepted by the persistence service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewTicker {
    pub tick_id: i64,
    pub product_code: String,
    pub state: String,
    pub timestamp: String,
    pub best_bid: f64,
    pub best_ask: f64,
    pub best_bid_size: f64,
    pub best_ask_size: f64,
    pub total_bid_depth: f64,
    pub total_ask_depth: f64,
    pub market_bid_size: f64,
    pub market_ask_size: f64,
    pub ltp: f64,
    pub volume: f64,
    pub volume_by_product: f64,
}

/// A ticker row as returned by the persistence service, including its id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredTicker {
    pub id: i64,
    #[serde(flatten)]
    pub ticker: NewTicker,
}

impl StoredTicker {
    pub fn into_new_ticker(self) -> NewTicker {
        self.ticker
    }
}

pub fn convert_ticker_from_source(ticker: &Ticker) -> NewTicker {
    NewTicker {
        tick_id: ticker.tick_id,
        product_code: ticker.product_code.clone(),
        state: ticker.state.clone(),
        timestamp: ticker.timestamp.clone(),
        best_bid: ticker.best_bid,
        best_ask: ticker.best_ask,
        best_bid_size: ticker.best_bid_size,
        best_ask_size: ticker.best_ask_size,
        total_bid_depth: ticker.total_bid_depth,
        total_ask_depth: ticker.total_ask_depth,
        market_bid_size: ticker.market_bid_size,
        market_ask_size: ticker.market_ask_size,
        ltp: ticker.ltp,
        volume: ticker.volume,
        volume_by_product: ticker.volume_by_product,
    }
}
