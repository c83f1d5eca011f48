//! Dashboard wallet arithmetic over the trading collaborator.
//!
//! The simulated investment return mirrors the product's display behavior:
//! outcomes are floored to stay positive. The constants here are display
//! placeholders, not a verified financial model.

use crate::client::TradingClient;
use chrono::Utc;
use fxbet_domain::{NewTrade, Portfolio, Trade, TradeSide, TradeStats};
use rand::Rng;
use tracing::warn;

/// Account whose open trades seed the return computation.
pub const REFERENCE_ACCOUNT: i64 = 9_924_570;

/// Guaranteed minimum gain applied to trade-derived returns, in percent.
const RETURN_FLOOR_PERCENT: f64 = 5.0;
const MAX_SYMBOL_CHARS: usize = 16;
const MAX_COMMENT_CHARS: usize = 255;

/// Result of an investment-return computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvestmentOutcome {
    pub new_balance: f64,
    pub profit: f64,
    pub return_percentage: f64,
}

/// Wallet services for the portfolio dashboard.
#[derive(Debug, Clone)]
pub struct WalletService {
    client: TradingClient,
    reference_account: i64,
}

impl WalletService {
    #[must_use]
    pub fn new(client: TradingClient) -> Self {
        Self { client, reference_account: REFERENCE_ACCOUNT }
    }

    /// Overrides the account whose trades seed the return computation.
    #[must_use]
    pub const fn with_reference_account(mut self, account: i64) -> Self {
        self.reference_account = account;
        self
    }

    /// Computes the simulated return for an invested amount.
    ///
    /// With open trades available, the gain is `|profit| / lot_size`
    /// percent of the amount, floored at the guaranteed minimum. Without
    /// trades a 5–15% gain is simulated; an unreachable collaborator falls
    /// back to a simulated 7–15% gain.
    pub async fn investment_return(&self, amount: f64) -> InvestmentOutcome {
        let trades =
            match self.client.fetch_trades_by_account_and_history(self.reference_account, false).await
            {
                Ok(trades) => trades,
                Err(error) => {
                    warn!(error = %error, "Return computation fell back to simulated gain");
                    return outcome(amount, rand::thread_rng().gen_range(7.0..15.0));
                }
            };

        let Some(first) = trades.first() else {
            return outcome(amount, rand::thread_rng().gen_range(5.0..15.0));
        };

        let trade_profit = first.profit.unwrap_or(0.0).abs();
        let lot_size = effective_lot_size(first);
        let profit_per_lot =
            if lot_size > 0.0 { trade_profit / lot_size } else { trade_profit };
        outcome(amount, profit_per_lot.max(RETURN_FLOOR_PERCENT))
    }

    /// Composes the trade recorded against an investment outcome.
    #[must_use]
    pub fn trade_from_investment(
        &self,
        portfolio: &Portfolio,
        account_number: i64,
        amount: f64,
        return_value: f64,
    ) -> NewTrade {
        // Timestamp plus a random tail keeps concurrent tickets distinct.
        let ticket = Utc::now().timestamp_millis() + rand::thread_rng().gen_range(0..1_000);
        let symbol: String = portfolio.name.to_uppercase().chars().take(MAX_SYMBOL_CHARS).collect();
        let side = if return_value >= 0.0 { TradeSide::Buy } else { TradeSide::Sell };
        let price_open = 1.0;
        let price = if amount > 0.0 { round2(price_open + return_value / amount) } else { price_open };
        let comment: String = format!("Investimento em {}", portfolio.name)
            .chars()
            .take(MAX_COMMENT_CHARS)
            .collect();

        NewTrade {
            account_number,
            ticket,
            magic: Some(portfolio.id),
            symbol,
            side,
            volume: round2(amount / 100.0),
            price_open,
            price: Some(price),
            profit: Some(round2(return_value)),
            is_history: Some(false),
            comment: Some(comment),
            open_time: Some(Utc::now()),
        }
    }

    /// Aggregate figures over an account's trades. A degraded (empty)
    /// listing yields zeroed stats.
    pub async fn trade_stats(&self, account: i64) -> TradeStats {
        let trades = self.client.trades_by_account(account).await;

        let total_trades = trades.len();
        let total_profit: f64 = trades.iter().map(|t| t.profit.unwrap_or(0.0)).sum();
        let total_volume: f64 = trades.iter().map(|t| t.volume).sum();
        let winning = trades.iter().filter(|t| t.profit.unwrap_or(0.0) > 0.0).count();

        let (win_rate, avg_profit) = if total_trades > 0 {
            (
                (winning as f64 / total_trades as f64) * 100.0,
                total_profit / total_trades as f64,
            )
        } else {
            (0.0, 0.0)
        };

        TradeStats { total_trades, total_profit, total_volume, win_rate, avg_profit }
    }
}

fn outcome(amount: f64, return_percentage: f64) -> InvestmentOutcome {
    let profit = amount * (return_percentage / 100.0);
    InvestmentOutcome { new_balance: amount + profit, profit, return_percentage }
}

/// Lot size for the return formula, falling back to the trade volume and
/// finally to a single lot when both are zero.
fn effective_lot_size(trade: &Trade) -> f64 {
    match trade.lot_size {
        Some(lot_size) if lot_size != 0.0 => lot_size,
        _ if trade.volume != 0.0 => trade.volume,
        _ => 1.0,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
