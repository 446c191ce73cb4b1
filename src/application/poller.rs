use crate::domain::ports::MutationFeedBox;
use crate::domain::settlement::{SettlementCheck, contains_amount};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Hard bound on a single settlement check.
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

/// Checks whether a payment of a given amount shows up in a merchant's
/// mutation feed.
///
/// Each call performs exactly one feed request. Every failure mode (transport
/// error, timeout, bad status, unreadable body, empty history) resolves to
/// `pending` so that callers polling on an interval simply keep waiting.
pub struct SettlementPoller {
    feed: MutationFeedBox,
    timeout: Duration,
}

impl SettlementPoller {
    pub fn new(feed: MutationFeedBox) -> Self {
        Self::with_timeout(feed, DEFAULT_CHECK_TIMEOUT)
    }

    pub fn with_timeout(feed: MutationFeedBox, timeout: Duration) -> Self {
        Self { feed, timeout }
    }

    pub async fn check_settlement(
        &self,
        merchant_id: &str,
        access_token: &str,
        expected_amount: &str,
    ) -> SettlementCheck {
        let fetched =
            tokio::time::timeout(self.timeout, self.feed.fetch(merchant_id, access_token)).await;

        let history = match fetched {
            Ok(Ok(history)) => history,
            Ok(Err(e)) => {
                warn!(merchant = merchant_id, error = %e, "mutation feed request failed");
                return SettlementCheck::pending();
            }
            Err(_) => {
                warn!(
                    merchant = merchant_id,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "mutation feed request timed out"
                );
                return SettlementCheck::pending();
            }
        };

        let Some(mutations) = history.data.filter(|data| !data.is_empty()) else {
            debug!(merchant = merchant_id, "mutation history is empty");
            return SettlementCheck::pending();
        };

        if contains_amount(&mutations, expected_amount) {
            info!(merchant = merchant_id, amount = expected_amount, "payment settled");
            SettlementCheck::success()
        } else {
            debug!(
                merchant = merchant_id,
                amount = expected_amount,
                scanned = mutations.len(),
                "no matching mutation"
            );
            SettlementCheck::pending()
        }
    }
}
