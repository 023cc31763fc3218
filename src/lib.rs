//! Krishi Setu: crop listings and the interest approval workflow behind them.
//!
//! Farmers publish [`listing::Listing`]s, other actors register
//! [`interest::Interest`] in them, and the owner accepts or rejects each
//! interest once. [`service::MarketService`] is the entry point; [`web`] wraps
//! it in an HTTP/JSON API.

pub mod config;
pub mod error;
pub mod identity;
pub mod interest;
pub mod listing;
pub mod query;
pub mod service;
pub mod store;
pub mod utils;
pub mod views;
pub mod web;
