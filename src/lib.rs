pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;

pub use application::gateway::{PaymentGateway, PaymentRequest};
pub use application::poller::SettlementPoller;
pub use domain::amount::Amount;
pub use domain::crc::crc16;
pub use domain::payload::build_payload;
pub use domain::settlement::{SettlementCheck, SettlementStatus};
pub use error::{QrisError, Result};
