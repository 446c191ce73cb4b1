//! Application layer orchestrating the domain codec and the mutation feed.
//!
//! `PaymentGateway` produces amount-bound payment requests and
//! `SettlementPoller` performs single, fail-safe settlement checks.

pub mod gateway;
pub mod poller;
