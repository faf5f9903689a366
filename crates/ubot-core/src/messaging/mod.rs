//! Messenger-neutral inbound/outbound model and the outbound port.

pub mod port;
pub mod types;
