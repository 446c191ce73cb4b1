use super::settlement::MutationHistory;
use crate::error::Result;
use async_trait::async_trait;

/// Source of a merchant's recent incoming payments.
#[async_trait]
pub trait MutationFeed: Send + Sync {
    async fn fetch(&self, merchant_id: &str, access_token: &str) -> Result<MutationHistory>;
}

pub type MutationFeedBox = Box<dyn MutationFeed>;
