use crate::domain::ports::MutationFeed;
use crate::domain::settlement::{Mutation, MutationHistory};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory mutation feed.
///
/// Histories are keyed by `(merchant_id, access_token)`, mirroring the remote
/// feed's URL. Unknown keys yield a history without `data`.
#[derive(Default, Clone)]
pub struct InMemoryMutationFeed {
    histories: Arc<RwLock<HashMap<(String, String), Vec<Mutation>>>>,
}

impl InMemoryMutationFeed {
    /// Creates a new, empty in-memory feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an incoming payment for the given merchant credentials.
    pub async fn push(&self, merchant_id: &str, access_token: &str, mutation: Mutation) {
        let mut histories = self.histories.write().await;
        histories
            .entry((merchant_id.to_string(), access_token.to_string()))
            .or_default()
            .push(mutation);
    }
}

#[async_trait]
impl MutationFeed for InMemoryMutationFeed {
    async fn fetch(&self, merchant_id: &str, access_token: &str) -> Result<MutationHistory> {
        let histories = self.histories.read().await;
        let data = histories
            .get(&(merchant_id.to_string(), access_token.to_string()))
            .cloned();
        Ok(MutationHistory { data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_push_and_fetch() {
        let feed = InMemoryMutationFeed::new();
        feed.push("M1", "T1", Mutation::new("Rp 1.000")).await;
        feed.push("M1", "T1", Mutation::new("Rp 2.000")).await;

        let history = feed.fetch("M1", "T1").await.unwrap();
        assert_eq!(history.data.unwrap().len(), 2);

        let other = feed.fetch("M1", "wrong-token").await.unwrap();
        assert!(other.data.is_none());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let feed = InMemoryMutationFeed::new();
        let handle = feed.clone();
        handle.push("M1", "T1", Mutation::new("500")).await;

        assert!(feed.fetch("M1", "T1").await.unwrap().data.is_some());
    }
}
