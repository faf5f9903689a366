//! Core domain + dispatch logic for the utility bot.
//!
//! This crate is intentionally framework-agnostic. Telegram lives behind the
//! messaging port implemented in the adapter crate.

pub mod config;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod fault;
pub mod logging;
pub mod messaging;

pub use errors::{Error, Result};
