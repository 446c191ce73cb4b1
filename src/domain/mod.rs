//! Domain layer: the EMV-MPM codec, its checksum, and the value types shared
//! by payload generation and settlement checks.

pub mod amount;
pub mod crc;
pub mod payload;
pub mod ports;
pub mod settlement;
pub mod tlv;
pub mod transaction;
