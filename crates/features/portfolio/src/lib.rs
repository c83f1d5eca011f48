//! # Portfolio
//!
//! Trading/portfolio REST collaborator client and the wallet arithmetic
//! built on top of it.
//!
//! The client deliberately never propagates failures on its public
//! surface: reads degrade to empty or placeholder values and writes
//! degrade to locally-built echoes of the request, each degradation logged
//! at `warn`. Callers treat a degraded empty/placeholder result as the
//! error signal; nothing here raises.

pub mod client;
pub mod wallet;

pub use crate::client::{TradingClient, TradingError};
pub use crate::wallet::{InvestmentOutcome, REFERENCE_ACCOUNT, WalletService};
