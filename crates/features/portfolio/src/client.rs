//! Client for the trading/portfolio REST collaborator.
//!
//! Every public operation is total: transport failures, HTTP 405 and other
//! collaborator errors degrade to an empty result, a placeholder, or a
//! local echo of the request instead of propagating. [`TradingError`] only
//! travels inside the crate.

use chrono::Utc;
use fxbet_domain::config::TradingApiConfig;
use fxbet_domain::{
    Investment, NewInvestment, NewPortfolio, NewTrade, PaginatedTrades, Portfolio, PortfolioPatch,
    Trade,
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Balance shown when a portfolio read has to be answered locally.
const OFFLINE_BALANCE: f64 = 5_000.0;
const OFFLINE_PORTFOLIO_NAME: &str = "Portfolio Offline";
const OFFLINE_TRADE_COMMENT: &str = "Trade Offline";

/// Collaborator failure, before degradation is applied.
#[derive(Debug, thiserror::Error)]
pub enum TradingError {
    #[error("trading API unreachable: {0}")]
    Network(String),

    #[error("trading API answered {status}")]
    Status { status: u16 },

    #[error("trading API returned a malformed body: {0}")]
    Malformed(String),
}

/// HTTP client for the trading collaborator.
#[derive(Debug, Clone)]
pub struct TradingClient {
    http: reqwest::Client,
    base_url: String,
}

impl TradingClient {
    /// Builds the client from the API section of the configuration.
    ///
    /// # Errors
    /// Returns [`TradingError::Network`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: &TradingApiConfig) -> Result<Self, TradingError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| TradingError::Network(e.to_string()))?;

        Ok(Self { http, base_url: config.base_url.trim_end_matches('/').to_owned() })
    }

    // --- Trades ---

    /// Every trade known to the collaborator.
    pub async fn all_trades(&self) -> Vec<Trade> {
        degraded(self.fetch("/trades").await, "trade listing", Vec::new)
    }

    /// A single trade, `None` when unreadable.
    pub async fn trade_by_id(&self, id: i64) -> Option<Trade> {
        degraded(self.fetch(&format!("/trades/{id}")).await.map(Some), "trade read", || None)
    }

    /// Trades for one account.
    pub async fn trades_by_account(&self, account: i64) -> Vec<Trade> {
        degraded(
            self.fetch(&format!("/trades/account/{account}")).await,
            "account trade listing",
            Vec::new,
        )
    }

    /// One page of an account's trades.
    pub async fn trades_by_account_paginated(
        &self,
        account: i64,
        page: u32,
        size: u32,
    ) -> PaginatedTrades {
        degraded(
            self.fetch(&format!("/trades/account/{account}/paginated?page={page}&size={size}"))
                .await,
            "paginated trade listing",
            || empty_page(page, size),
        )
    }

    /// Trades for one symbol.
    pub async fn trades_by_symbol(&self, symbol: &str) -> Vec<Trade> {
        degraded(
            self.fetch(&format!("/trades/symbol/{symbol}")).await,
            "symbol trade listing",
            Vec::new,
        )
    }

    /// Open or historical trades for one account.
    pub async fn trades_by_account_and_history(&self, account: i64, is_history: bool) -> Vec<Trade> {
        degraded(
            self.fetch_trades_by_account_and_history(account, is_history).await,
            "account/history trade listing",
            Vec::new,
        )
    }

    /// Raw variant for callers inside the crate that need to observe the
    /// failure instead of the degraded value.
    pub(crate) async fn fetch_trades_by_account_and_history(
        &self,
        account: i64,
        is_history: bool,
    ) -> Result<Vec<Trade>, TradingError> {
        self.fetch(&format!("/trades/accountNumber/{account}/isHistory/{is_history}")).await
    }

    /// Stores a trade; an unreachable collaborator yields a local echo of
    /// the request.
    pub async fn create_trade(&self, trade: &NewTrade) -> Trade {
        let outcome = self.send(self.http.post(self.url("/trades")).json(trade)).await;
        degraded(outcome, "trade creation", || offline_trade(trade))
    }

    /// Updates a trade; degrades to an echo carrying the requested values.
    pub async fn update_trade(&self, id: i64, trade: &NewTrade) -> Trade {
        let outcome = self.send(self.http.put(self.url(&format!("/trades/{id}"))).json(trade)).await;
        degraded(outcome, "trade update", || Trade { id, ..offline_trade(trade) })
    }

    /// Deletes a trade; failures are ignored.
    pub async fn delete_trade(&self, id: i64) {
        let outcome = self.send_unit(self.http.delete(self.url(&format!("/trades/{id}")))).await;
        degraded(outcome.map(|_| ()), "trade deletion", || ());
    }

    // --- Portfolios ---

    /// Every portfolio.
    pub async fn portfolios(&self) -> Vec<Portfolio> {
        degraded(self.fetch("/portfolios").await, "portfolio listing", Vec::new)
    }

    /// A single portfolio; unreadable ones degrade to the offline
    /// placeholder so the dashboard still renders.
    pub async fn portfolio_by_id(&self, id: i64) -> Portfolio {
        degraded(self.fetch(&format!("/portfolios/{id}")).await, "portfolio read", || {
            offline_portfolio(id)
        })
    }

    /// Creates a portfolio; degrades to an echo of the request.
    pub async fn create_portfolio(&self, portfolio: &NewPortfolio) -> Portfolio {
        let outcome = self.send(self.http.post(self.url("/portfolios")).json(portfolio)).await;
        degraded(outcome, "portfolio creation", || Portfolio {
            id: Utc::now().timestamp_millis(),
            user_id: portfolio.user_id,
            name: portfolio.name.clone(),
            balance: portfolio.balance,
            profit: portfolio.profit,
            profit_percentage: portfolio.profit_percentage,
            created_at: Utc::now(),
            investments: Vec::new(),
        })
    }

    /// Patches a portfolio; degrades to an echo carrying the patched
    /// values over the offline placeholder.
    pub async fn update_portfolio(&self, id: i64, patch: &PortfolioPatch) -> Portfolio {
        let outcome =
            self.send(self.http.put(self.url(&format!("/portfolios/{id}"))).json(patch)).await;
        degraded(outcome, "portfolio update", || {
            let mut portfolio = offline_portfolio(id);
            if let Some(balance) = patch.balance {
                portfolio.balance = balance;
            }
            if let Some(profit) = patch.profit {
                portfolio.profit = profit;
            }
            if let Some(profit_percentage) = patch.profit_percentage {
                portfolio.profit_percentage = profit_percentage;
            }
            portfolio
        })
    }

    /// Deletes a portfolio; failures are ignored.
    pub async fn delete_portfolio(&self, id: i64) {
        let outcome =
            self.send_unit(self.http.delete(self.url(&format!("/portfolios/{id}")))).await;
        degraded(outcome.map(|_| ()), "portfolio deletion", || ());
    }

    // --- Investments ---

    /// Records an investment; degrades to an echo of the request.
    pub async fn create_investment(&self, investment: &NewInvestment) -> Investment {
        let outcome = self.send(self.http.post(self.url("/investments")).json(investment)).await;
        degraded(outcome, "investment creation", || Investment {
            id: Utc::now().timestamp_millis(),
            portfolio: investment.portfolio.name.clone(),
            date: investment.date,
            amount: investment.amount,
            return_value: investment.return_value,
            return_percentage: investment.return_percentage,
            created_at: Utc::now(),
        })
    }

    /// Investments recorded against one portfolio name.
    pub async fn investments_by_portfolio(&self, portfolio: &str) -> Vec<Investment> {
        let outcome = self
            .send(self.http.get(self.url("/investments")).query(&[("portfolio", portfolio)]))
            .await;
        degraded(outcome, "investment listing", Vec::new)
    }

    // --- Plumbing ---

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, TradingError> {
        self.send(self.http.get(self.url(path))).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, TradingError> {
        let response = self.send_unit(request).await?;
        response.json().await.map_err(|e| TradingError::Malformed(e.to_string()))
    }

    async fn send_unit(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, TradingError> {
        let response = request.send().await.map_err(|e| TradingError::Network(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            debug!(status = status.as_u16(), "Trading API answered");
            Ok(response)
        } else {
            Err(TradingError::Status { status: status.as_u16() })
        }
    }
}

fn degraded<T>(outcome: Result<T, TradingError>, what: &str, fallback: impl FnOnce() -> T) -> T {
    match outcome {
        Ok(value) => value,
        Err(error) => {
            warn!(error = %error, what, "Trading API degraded to local fallback");
            fallback()
        }
    }
}

fn empty_page(page: u32, size: u32) -> PaginatedTrades {
    PaginatedTrades {
        content: Vec::new(),
        total_elements: 0,
        total_pages: 0,
        size,
        number: page,
        first: true,
        last: true,
    }
}

fn offline_portfolio(id: i64) -> Portfolio {
    Portfolio {
        id,
        user_id: 1,
        name: OFFLINE_PORTFOLIO_NAME.to_owned(),
        balance: OFFLINE_BALANCE,
        profit: 0.0,
        profit_percentage: 0.0,
        created_at: Utc::now(),
        investments: Vec::new(),
    }
}

fn offline_trade(request: &NewTrade) -> Trade {
    let now = Utc::now();
    Trade {
        id: now.timestamp_millis(),
        account_number: request.account_number,
        ticket: request.ticket,
        magic: request.magic.or(Some(0)),
        symbol: request.symbol.clone(),
        side: request.side,
        volume: request.volume,
        price_open: request.price_open,
        price: request.price.or(Some(request.price_open)),
        profit: request.profit.or(Some(0.0)),
        lot_size: None,
        tick_time: Some(now),
        is_history: request.is_history.or(Some(false)),
        comment: request.comment.clone().or_else(|| Some(OFFLINE_TRADE_COMMENT.to_owned())),
        open_time: Some(now),
        created_at: now,
    }
}
