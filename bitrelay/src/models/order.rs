use super::ProductCode;
use crate::errors::{AppError, AppResult};
use core::fmt;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const MIN_MINUTE_TO_EXPIRE: i64 = 1;
/// 30 days.
pub const MAX_MINUTE_TO_EXPIRE: i64 = 43_200;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChildOrderType {
    Limit,
    Market,
}

impl FromStr for ChildOrderType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LIMIT" => Ok(ChildOrderType::Limit),
            "MARKET" => Ok(ChildOrderType::Market),
            _ => Err(AppError::BadRequest(format!("invalid child order type: {:?}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("BUY"),
            Side::Sell => f.write_str("SELL"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeInForce {
    /// Good till cancelled.
    Gtc,
    /// Immediate or cancel.
    Ioc,
    /// Fill or kill.
    Fok,
}

impl FromStr for TimeInForce {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GTC" => Ok(TimeInForce::Gtc),
            "IOC" => Ok(TimeInForce::Ioc),
            "FOK" => Ok(TimeInForce::Fok),
            _ => Err(AppError::BadRequest(format!("invalid time in force: {:?}", s))),
        }
    }
}

/// Body of `POST /bitflyer/order/{buy,sell}`. Fields stay loosely typed so a
/// bad value is reported as a validation error rather than a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderRequest {
    pub product_code: String,
    pub child_order_type: String,
    pub price: f64,
    pub size: f64,
    pub minute_to_expire: i64,
    pub time_in_force: String,
    pub is_dry: bool,
}

impl OrderRequest {
    pub fn to_child_order(&self, side: Side) -> AppResult<ChildOrder> {
        let product_code: ProductCode = self.product_code.parse()?;
        let child_order_type: ChildOrderType = self.child_order_type.parse()?;
        let time_in_force: TimeInForce = self.time_in_force.parse()?;

        if !(MIN_MINUTE_TO_EXPIRE..=MAX_MINUTE_TO_EXPIRE).contains(&self.minute_to_expire) {
            return Err(AppError::BadRequest(format!(
                "minute to expire must be between {} and {}",
                MIN_MINUTE_TO_EXPIRE, MAX_MINUTE_TO_EXPIRE
            )));
        }
        if child_order_type == ChildOrderType::Limit && self.price <= 0.0 {
            return Err(AppError::BadRequest(
                "price must be greater than 0 for LIMIT orders".to_string(),
            ));
        }
        if self.size <= 0.0 {
            return Err(AppError::BadRequest(
                "size must be greater than 0".to_string(),
            ));
        }

        Ok(ChildOrder {
            product_code,
            child_order_type,
            side,
            price: self.price,
            size: self.size,
            minute_to_expire: self.minute_to_expire,
            time_in_force,
        })
    }
}

/// The `sendchildorder` request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildOrder {
    pub product_code: ProductCode,
    pub child_order_type: ChildOrderType,
    pub side: Side,
    pub price: f64,
    pub size: f64,
    pub minute_to_expire: i64,
    pub time_in_force: TimeInForce,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChildOrderResponse {
    #[serde(default)]
    pub child_order_acceptance_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit_order() -> OrderRequest {
        OrderRequest {
            product_code: "BTC_JPY".to_string(),
            child_order_type: "LIMIT".to_string(),
            price: 9_000_000.0,
            size: 0.001,
            minute_to_expire: 60,
            time_in_force: "GTC".to_string(),
            is_dry: true,
        }
    }

    fn rejection(request: OrderRequest) -> String {
        match request.to_child_order(Side::Buy) {
            Err(AppError::BadRequest(msg)) => msg,
            other => panic!("expected a bad request, got {:?}", other),
        }
    }

    #[test]
    fn valid_order_converts() {
        let order = limit_order().to_child_order(Side::Sell).unwrap();
        assert_eq!(order.product_code, ProductCode::BtcJpy);
        assert_eq!(order.child_order_type, ChildOrderType::Limit);
        assert_eq!(order.side, Side::Sell);
        assert_eq!(order.time_in_force, TimeInForce::Gtc);
        assert_eq!(order.minute_to_expire, 60);
    }

    #[test]
    fn market_order_needs_no_price() {
        let request = OrderRequest {
            child_order_type: "MARKET".to_string(),
            price: 0.0,
            ..limit_order()
        };
        assert!(request.to_child_order(Side::Buy).is_ok());
    }

    #[test]
    fn each_field_is_validated() {
        assert!(rejection(OrderRequest {
            product_code: "DOGE_JPY".to_string(),
            ..limit_order()
        })
        .contains("product code"));
        assert!(rejection(OrderRequest {
            child_order_type: "STOP".to_string(),
            ..limit_order()
        })
        .contains("child order type"));
        assert!(rejection(OrderRequest {
            time_in_force: "DAY".to_string(),
            ..limit_order()
        })
        .contains("time in force"));
        assert!(rejection(OrderRequest {
            minute_to_expire: 0,
            ..limit_order()
        })
        .contains("minute to expire"));
        assert!(rejection(OrderRequest {
            minute_to_expire: MAX_MINUTE_TO_EXPIRE + 1,
            ..limit_order()
        })
        .contains("minute to expire"));
        assert!(rejection(OrderRequest {
            price: 0.0,
            ..limit_order()
        })
        .contains("price"));
        assert!(rejection(OrderRequest {
            size: -1.0,
            ..limit_order()
        })
        .contains("size"));
    }

    #[test]
    fn child_order_wire_format() {
        let order = limit_order().to_child_order(Side::Buy).unwrap();
        assert_eq!(
            serde_json::to_value(&order).unwrap(),
            serde_json::json!({
                "product_code": "BTC_JPY",
                "child_order_type": "LIMIT",
                "side": "BUY",
                "price": 9000000.0,
                "size": 0.001,
                "minute_to_expire": 60,
                "time_in_force": "GTC"
            })
        );
    }
}
