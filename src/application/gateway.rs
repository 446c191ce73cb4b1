use crate::domain::amount::Amount;
use crate::domain::payload::build_payload;
use crate::domain::settlement::SettlementStatus;
use crate::domain::transaction::{DEFAULT_EXPIRY_MINUTES, TransactionRecord};
use crate::error::Result;
use chrono::{DateTime, Duration, Local};
use rand::Rng;
use serde::Serialize;
use tracing::info;

/// Upper bound of the random fee added to each payment by default.
pub const DEFAULT_MAX_UNIQUE_FEE: u64 = 149;

/// A dynamic payment ready to be rendered as a QR code.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentRequest {
    pub transaction: TransactionRecord,
    pub base_amount: Amount,
    pub fee: u64,
    pub total_amount: Amount,
    pub qr_string: String,
    pub status: SettlementStatus,
}

/// Turns a merchant's static QRIS code into amount-bound payment requests.
///
/// A random fee in `1..=max_unique_fee` is added to every payment so that two
/// payments of the same base amount can be told apart in the mutation feed.
pub struct PaymentGateway {
    max_unique_fee: u64,
    validity: Duration,
}

impl Default for PaymentGateway {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNIQUE_FEE, Duration::minutes(DEFAULT_EXPIRY_MINUTES))
    }
}

impl PaymentGateway {
    /// Creates a gateway. A `max_unique_fee` of 0 disables the fee.
    pub fn new(max_unique_fee: u64, validity: Duration) -> Self {
        Self {
            max_unique_fee,
            validity,
        }
    }

    pub fn create_payment(
        &self,
        static_payload: &str,
        base_amount: Amount,
    ) -> Result<PaymentRequest> {
        self.create_payment_at(
            static_payload,
            base_amount,
            Local::now(),
            &mut rand::thread_rng(),
        )
    }

    pub fn create_payment_at<R: Rng + ?Sized>(
        &self,
        static_payload: &str,
        base_amount: Amount,
        now: DateTime<Local>,
        rng: &mut R,
    ) -> Result<PaymentRequest> {
        let fee = if self.max_unique_fee == 0 {
            0
        } else {
            rng.gen_range(1..=self.max_unique_fee)
        };
        let total_amount = base_amount.checked_add(fee)?;
        let qr_string = build_payload(static_payload, total_amount)?;
        let transaction = TransactionRecord::generate(total_amount, now, self.validity, rng);

        info!(
            id = %transaction.id,
            amount = %base_amount,
            fee,
            total = %total_amount,
            "created payment request"
        );

        Ok(PaymentRequest {
            transaction,
            base_amount,
            fee,
            total_amount,
            qr_string,
            status: SettlementStatus::Pending,
        })
    }
}
