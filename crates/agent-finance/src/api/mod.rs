//! API clients for the quote and web search providers

pub mod alpha_vantage;
pub mod serper;

pub use alpha_vantage::{AlphaVantageClient, GlobalQuote, parse_global_quote};
pub use serper::{NewsResult, SerperClient};
