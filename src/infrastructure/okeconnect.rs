use crate::domain::ports::MutationFeed;
use crate::domain::settlement::MutationHistory;
use crate::error::{QrisError, Result};
use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://gateway.okeconnect.com";

/// Mutation feed served over HTTP at
/// `{base_url}/api/mutasi/qris/{merchant_id}/{access_token}`.
#[derive(Debug, Clone)]
pub struct HttpMutationFeed {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpMutationFeed {
    /// Creates a feed client whose requests give up after `timeout`.
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let raw = base_url.as_ref();
        let base_url = Url::parse(raw)
            .map_err(|e| QrisError::InvalidConfig(format!("feed base url {:?}: {}", raw, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(QrisError::InvalidConfig(format!(
                "feed base url {:?} cannot hold a path",
                base_url.as_str()
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("qrispay/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Merchant id and token are appended as single, percent-encoded segments.
    fn history_url(&self, merchant_id: &str, access_token: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| QrisError::InvalidConfig("feed base url cannot hold a path".into()))?
            .pop_if_empty()
            .extend(["api", "mutasi", "qris", merchant_id, access_token]);
        Ok(url)
    }
}

#[async_trait]
impl MutationFeed for HttpMutationFeed {
    async fn fetch(&self, merchant_id: &str, access_token: &str) -> Result<MutationHistory> {
        let url = self.history_url(merchant_id, access_token)?;
        debug!(merchant = merchant_id, "requesting mutation history");

        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(QrisError::Feed(format!(
                "mutation feed returned HTTP {}",
                status
            )));
        }

        resp.json::<MutationHistory>()
            .await
            .map_err(|e| QrisError::Feed(format!("unreadable mutation history: {}", e)))
    }
}
