use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::mastodon::StatusFeed;
use crate::mistral::VisionModel;
use crate::model::fixture::{Lineup, LineupOrigin};
use crate::model::mastodon::Status;

use super::LineupResolver;

pub const LINEUP_PROMPT: &str = concat!(
    "Get the lineup from this image in the JSON format: ",
    r#"{"starters": ["NAME"], "bench": ["NAME"]}, "#,
    r#"replacing "NAME" with the names of the players. "#,
    r#"If this is not an image of a team sheet, respond in the JSON format: {"error": true}. "#,
    "Only respond with JSON",
);

/// Team sheet images can be posted slightly before the expected announcement.
pub const POST_GRACE: Duration = Duration::minutes(2);

/// Reads the lineup off the club's team sheet image with a vision model.
#[derive(Debug, Clone)]
pub struct VisionResolver<F, V> {
    feed: F,
    model: V,
    announced_at: DateTime<Utc>,
}

impl<F, V> VisionResolver<F, V>
where
    F: StatusFeed,
    V: VisionModel,
{
    pub fn new(feed: F, model: V, announced_at: DateTime<Utc>) -> Self {
        Self { feed, model, announced_at }
    }

    pub fn into_parts(self) -> (F, V, DateTime<Utc>) {
        (self.feed, self.model, self.announced_at)
    }
}

/// Earliest single-image post made after `announced_at - POST_GRACE`, returned as its image URL.
pub fn select_candidate(statuses: &[Status], announced_at: DateTime<Utc>) -> Option<String> {
    let posted_after = announced_at - POST_GRACE;
    let mut candidates: Vec<&Status> = statuses
        .iter()
        .filter(|s| s.in_reply_to_id.is_none() && s.reblog.is_none())
        .filter(|s| s.media_attachments.len() == 1 && s.media_attachments[0].kind == "image")
        .filter(|s| s.created_at > posted_after)
        .collect();
    candidates.sort_by_key(|s| s.created_at);
    candidates
        .first()
        .and_then(|s| s.media_attachments[0].image_url())
        .map(str::to_string)
}

/// Validate a model answer.
/// Anything but `{"starters": [..strings], "bench": [..strings]}` is rejected.
pub fn parse_lineup(content: &str) -> Option<Lineup> {
    let value: serde_json::Value = serde_json::from_str(content).ok()?;
    let names = |field: &str| -> Option<Vec<String>> {
        value
            .get(field)?
            .as_array()?
            .iter()
            .map(|name| name.as_str().map(str::to_string))
            .collect()
    };
    Some(Lineup { starters: names("starters")?, bench: names("bench")? })
}

impl<F, V> LineupResolver for VisionResolver<F, V>
where
    F: StatusFeed + Sync,
    V: VisionModel + Sync,
{
    fn origin(&self) -> LineupOrigin {
        LineupOrigin::Vision
    }

    #[instrument(level = "info", skip(self), fields(announced_at = %self.announced_at))]
    async fn resolve(&self, _match_id: i64) -> Result<Option<Lineup>> {
        let statuses = self.feed.recent_media_statuses().await?;
        let Some(image_url) = select_candidate(&statuses, self.announced_at) else {
            info!("No potential lineup images posted yet");
            return Ok(None);
        };
        info!(image_url = %image_url, "Using lineup image candidate");

        let Some(content) = self.model.complete(&image_url, LINEUP_PROMPT).await? else {
            return Ok(None);
        };
        let lineup = parse_lineup(&content);
        if lineup.is_none() {
            debug!(content = %content, "Model answer is not a lineup");
        }
        Ok(lineup)
    }
}
