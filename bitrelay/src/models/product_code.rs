use crate::errors::AppError;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ProductCode {
    #[serde(rename = "BTC_JPY")]
    BtcJpy,

    #[serde(rename = "XRP_JPY")]
    XrpJpy,

    #[serde(rename = "ETH_JPY")]
    EthJpy,

    #[serde(rename = "XLM_JPY")]
    XlmJpy,

    #[serde(rename = "MONA_JPY")]
    MonaJpy,

    #[serde(rename = "ETH_BTC")]
    EthBtc,

    #[serde(rename = "BCH_BTC")]
    BchBtc,

    #[serde(rename = "FX_BTC_JPY")]
    FxBtcJpy,
}

impl ProductCode {
    pub const ALL: [ProductCode; 8] = [
        ProductCode::BtcJpy,
        ProductCode::XrpJpy,
        ProductCode::EthJpy,
        ProductCode::XlmJpy,
        ProductCode::MonaJpy,
        ProductCode::EthBtc,
        ProductCode::BchBtc,
        ProductCode::FxBtcJpy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCode::BtcJpy => "BTC_JPY",
            ProductCode::XrpJpy => "XRP_JPY",
            ProductCode::EthJpy => "ETH_JPY",
            ProductCode::XlmJpy => "XLM_JPY",
            ProductCode::MonaJpy => "MONA_JPY",
            ProductCode::EthBtc => "ETH_BTC",
            ProductCode::BchBtc => "BCH_BTC",
            ProductCode::FxBtcJpy => "FX_BTC_JPY",
        }
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| AppError::BadRequest(format!("invalid product code: {:?}", s)))
    }
}
