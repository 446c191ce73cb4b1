use crate::domain::amount::Amount;
use chrono::{DateTime, Duration, Local};
use rand::Rng;
use serde::Serialize;

const ID_PREFIX: &str = "QRIS";
const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const TIMESTAMP_DIGITS: usize = 8;
const RANDOM_CHARS: usize = 4;

/// Default validity window of a generated payment.
pub const DEFAULT_EXPIRY_MINUTES: i64 = 5;

/// Generates a transaction id: `QRIS` + last 8 digits of the epoch millis +
/// 4 uppercase base36 characters.
///
/// Uniqueness is best effort; two ids generated in the same millisecond
/// collide with probability 1/36^4.
pub fn generate_transaction_id<R: Rng + ?Sized>(now: DateTime<Local>, rng: &mut R) -> String {
    let millis = now.timestamp_millis().to_string();
    let tail = &millis[millis.len().saturating_sub(TIMESTAMP_DIGITS)..];

    let mut id = String::with_capacity(ID_PREFIX.len() + TIMESTAMP_DIGITS + RANDOM_CHARS);
    id.push_str(ID_PREFIX);
    id.push_str(tail);
    for _ in 0..RANDOM_CHARS {
        id.push(BASE36[rng.gen_range(0..BASE36.len())] as char);
    }
    id
}

/// Identity and validity window of a generated dynamic payload.
///
/// Not persisted; callers that need to track it store it themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    pub id: String,
    pub amount: Amount,
    pub created_at: DateTime<Local>,
    pub expires_at: DateTime<Local>,
}

impl TransactionRecord {
    pub fn new(amount: Amount, validity: Duration) -> Self {
        Self::generate(amount, Local::now(), validity, &mut rand::thread_rng())
    }

    pub fn generate<R: Rng + ?Sized>(
        amount: Amount,
        now: DateTime<Local>,
        validity: Duration,
        rng: &mut R,
    ) -> Self {
        Self {
            id: generate_transaction_id(now, rng),
            amount,
            created_at: now,
            expires_at: now + validity,
        }
    }

    pub fn is_expired(&self, now: DateTime<Local>) -> bool {
        now >= self.expires_at
    }
}
