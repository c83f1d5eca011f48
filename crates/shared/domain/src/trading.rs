//! Trading and portfolio DTOs for the REST collaborator.
//!
//! These mirror the API's JSON verbatim, including the `loteSize` spelling
//! it uses on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Order direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

/// A trade as returned by the collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: i64,
    pub account_number: i64,
    pub ticket: i64,
    #[serde(default)]
    pub magic: Option<i64>,
    pub symbol: String,
    #[serde(rename = "type")]
    pub side: TradeSide,
    pub volume: f64,
    pub price_open: f64,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub profit: Option<f64>,
    #[serde(rename = "loteSize", default)]
    pub lot_size: Option<f64>,
    #[serde(rename = "t", default)]
    pub tick_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_history: Option<bool>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub open_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrade {
    pub account_number: i64,
    pub ticket: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magic: Option<i64>,
    pub symbol: String,
    #[serde(rename = "type")]
    pub side: TradeSide,
    pub volume: f64,
    pub price_open: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_history: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_time: Option<DateTime<Utc>>,
}

/// One page of trades.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedTrades {
    pub content: Vec<Trade>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub size: u32,
    pub number: u32,
    pub first: bool,
    pub last: bool,
}

/// Aggregate figures over an account's trades.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeStats {
    pub total_trades: usize,
    pub total_profit: f64,
    pub total_volume: f64,
    pub win_rate: f64,
    pub avg_profit: f64,
}

/// A portfolio as returned by the collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub balance: f64,
    pub profit: f64,
    pub profit_percentage: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub investments: Vec<String>,
}

/// Payload for creating a portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolio {
    pub user_id: i64,
    pub name: String,
    pub balance: f64,
    pub profit: f64,
    pub profit_percentage: f64,
}

/// Partial update for a portfolio.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_percentage: Option<f64>,
}

/// An investment record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: i64,
    pub portfolio: String,
    pub date: DateTime<Utc>,
    pub amount: f64,
    pub return_value: f64,
    pub return_percentage: f64,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating an investment. The collaborator expects the full
/// portfolio nested in the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvestment {
    pub portfolio: Portfolio,
    pub date: DateTime<Utc>,
    pub amount: f64,
    pub return_value: f64,
    pub return_percentage: f64,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trade_side_uses_lowercase_wire_values() {
        assert_eq!(serde_json::to_string(&TradeSide::Buy).unwrap(), "\"buy\"");
        assert_eq!(TradeSide::Sell.to_string(), "sell");
    }

    #[test]
    fn trade_deserializes_wire_spelling() {
        let raw = serde_json::json!({
            "id": 7,
            "accountNumber": 9_924_570_i64,
            "ticket": 1_001,
            "symbol": "MILANEX",
            "type": "buy",
            "volume": 1.5,
            "priceOpen": 1.0,
            "profit": 42.5,
            "loteSize": 0.5,
            "createdAt": "2025-04-01T12:00:00Z"
        });

        let trade: Trade = serde_json::from_value(raw).unwrap();
        assert_eq!(trade.account_number, 9_924_570);
        assert_eq!(trade.lot_size, Some(0.5));
        assert_eq!(trade.side, TradeSide::Buy);
        assert!(trade.magic.is_none());
    }
}
