use std::future::Future;

use tracing::{info, info_span};

use crate::error::Result;
use crate::model::mastodon::Status;

const STATUS_LIMIT: u32 = 15;

/// Recent media posts from the account that publishes team sheets.
pub trait StatusFeed {
    fn recent_media_statuses(&self) -> impl Future<Output = Result<Vec<Status>>> + Send;
}

#[derive(Debug, Clone)]
pub struct MastodonClient {
    instance_url: String,
    account_id: String,
}

impl MastodonClient {
    pub fn new(instance_url: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self { instance_url: instance_url.into(), account_id: account_id.into() }
    }

    /// Fetch the latest media-only posts, without replies or boosts.
    pub fn statuses(&self) -> Result<Vec<Status>> {
        let url = format!(
            "{}/api/v1/accounts/{}/statuses",
            self.instance_url.trim_end_matches('/'),
            self.account_id
        );
        let response = {
            let _span = info_span!("mastodon_fetch", url = %url).entered();
            ureq::get(&url)
                .query("only_media", "true")
                .query("exclude_replies", "true")
                .query("exclude_reblogs", "true")
                .query("limit", STATUS_LIMIT.to_string())
                .call()?
        };
        let statuses = response.into_body().read_json::<Vec<Status>>()?;
        info!(count = statuses.len(), "Fetched Mastodon statuses");
        Ok(statuses)
    }
}

impl StatusFeed for MastodonClient {
    async fn recent_media_statuses(&self) -> Result<Vec<Status>> {
        let client = self.clone();
        tokio::task::spawn_blocking(move || client.statuses()).await?
    }
}
