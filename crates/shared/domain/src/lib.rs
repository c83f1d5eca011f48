//! # Domain Models
//!
//! This crate contains pure domain types with minimal dependencies
//! (`serde`, `chrono`, `strum`). Keep it lean: no I/O, networking, or heavy
//! logic, just data and simple helpers.
//!
//! The wire shapes mirror the external collaborators verbatim (the identity
//! document store and the trading REST API), so field renames live here and
//! nowhere else.

pub mod config;
pub mod profile;
pub mod trading;

pub use crate::profile::{DocumentSet, Gender, Nationality, UserProfile};
pub use crate::trading::{
    Investment, NewInvestment, NewPortfolio, NewTrade, PaginatedTrades, Portfolio, PortfolioPatch,
    Trade, TradeSide, TradeStats,
};
