use std::collections::HashMap;
use std::future::Future;

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use tracing::{info, instrument};

use crate::error::{Error, Result};
use crate::model::fixture::{FixtureRecord, Lineup, StoredLineup};

const PARTITION_KEY: &str = "PK";
const LINEUP_ATTRIBUTE: &str = "lineup";
const ANNOUNCED_ATTRIBUTE: &str = "announced";

/// Persistence for one record per tracked match.
pub trait FixtureStore {
    /// Create or replace the record for a fixture.
    fn put_fixture(&self, record: &FixtureRecord) -> impl Future<Output = Result<()>> + Send;

    fn lineup(&self, match_id: i64) -> impl Future<Output = Result<Option<StoredLineup>>> + Send;

    /// Store a lineup unless one is already present.
    /// Returns `false` when another writer got there first.
    fn set_lineup_if_absent(
        &self,
        match_id: i64,
        lineup: &Lineup,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Record that the stored lineup has been announced.
    fn mark_announced(&self, match_id: i64) -> impl Future<Output = Result<()>> + Send;
}

/// [`FixtureStore`] backed by a DynamoDB table with a numeric `PK`.
#[derive(Debug, Clone)]
pub struct DynamoFixtureStore {
    client: Client,
    table_name: String,
}

impl DynamoFixtureStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self { client, table_name: table_name.into() }
    }
}

impl FixtureStore for DynamoFixtureStore {
    #[instrument(level = "info", skip(self, record), fields(match_id = record.match_id))]
    async fn put_fixture(&self, record: &FixtureRecord) -> Result<()> {
        let mut request = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .item(PARTITION_KEY, key(record.match_id))
            .item("tournamentId", AttributeValue::N(record.tournament_id.to_string()))
            .item("kickOff", AttributeValue::S(record.kick_off.to_rfc3339()))
            .item(ANNOUNCED_ATTRIBUTE, AttributeValue::Bool(record.announced));
        if let Some(lineup) = &record.lineup {
            request = request.item(LINEUP_ATTRIBUTE, lineup_to_attribute(lineup));
        }
        request.send().await.map_err(aws_sdk_dynamodb::Error::from)?;
        info!(table = %self.table_name, "Stored fixture record");
        Ok(())
    }

    #[instrument(level = "info", skip(self))]
    async fn lineup(&self, match_id: i64) -> Result<Option<StoredLineup>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(PARTITION_KEY, key(match_id))
            .projection_expression("#lineup, #announced")
            .expression_attribute_names("#lineup", LINEUP_ATTRIBUTE)
            .expression_attribute_names("#announced", ANNOUNCED_ATTRIBUTE)
            .send()
            .await
            .map_err(aws_sdk_dynamodb::Error::from)?;

        let Some(item) = output.item() else {
            return Ok(None);
        };
        let lineup = match item.get(LINEUP_ATTRIBUTE) {
            Some(AttributeValue::Null(_)) | None => return Ok(None),
            Some(value) => lineup_from_attribute(value).ok_or_else(|| {
                Error::malformed_record(match_id, "lineup is not a starters/bench map")
            })?,
        };
        // Records written before the flag existed count as not announced
        let announced = item
            .get(ANNOUNCED_ATTRIBUTE)
            .and_then(|value| value.as_bool().ok())
            .copied()
            .unwrap_or(false);
        Ok(Some(StoredLineup { lineup, announced }))
    }

    #[instrument(level = "info", skip(self, lineup))]
    async fn set_lineup_if_absent(&self, match_id: i64, lineup: &Lineup) -> Result<bool> {
        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(PARTITION_KEY, key(match_id))
            .update_expression("SET #lineup = :lineup, #announced = :announced")
            .condition_expression("attribute_not_exists(#lineup)")
            .expression_attribute_names("#lineup", LINEUP_ATTRIBUTE)
            .expression_attribute_names("#announced", ANNOUNCED_ATTRIBUTE)
            .expression_attribute_values(":lineup", lineup_to_attribute(lineup))
            .expression_attribute_values(":announced", AttributeValue::Bool(false))
            .send()
            .await;

        match result.map_err(aws_sdk_dynamodb::Error::from) {
            Ok(_) => Ok(true),
            Err(aws_sdk_dynamodb::Error::ConditionalCheckFailedException(_)) => {
                info!("Lineup was written by another check first");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(level = "info", skip(self))]
    async fn mark_announced(&self, match_id: i64) -> Result<()> {
        self.client
            .update_item()
            .table_name(&self.table_name)
            .key(PARTITION_KEY, key(match_id))
            .update_expression("SET #announced = :announced")
            .condition_expression("attribute_exists(#lineup)")
            .expression_attribute_names("#lineup", LINEUP_ATTRIBUTE)
            .expression_attribute_names("#announced", ANNOUNCED_ATTRIBUTE)
            .expression_attribute_values(":announced", AttributeValue::Bool(true))
            .send()
            .await
            .map_err(aws_sdk_dynamodb::Error::from)?;
        Ok(())
    }
}

fn key(match_id: i64) -> AttributeValue {
    AttributeValue::N(match_id.to_string())
}

fn names_to_attribute(names: &[String]) -> AttributeValue {
    AttributeValue::L(names.iter().cloned().map(AttributeValue::S).collect())
}

fn names_from_attribute(value: &AttributeValue) -> Option<Vec<String>> {
    value
        .as_l()
        .ok()?
        .iter()
        .map(|name| name.as_s().ok().cloned())
        .collect()
}

pub(crate) fn lineup_to_attribute(lineup: &Lineup) -> AttributeValue {
    let mut map = HashMap::new();
    map.insert("starters".to_string(), names_to_attribute(&lineup.starters));
    map.insert("bench".to_string(), names_to_attribute(&lineup.bench));
    AttributeValue::M(map)
}

pub(crate) fn lineup_from_attribute(value: &AttributeValue) -> Option<Lineup> {
    let map = value.as_m().ok()?;
    Some(Lineup {
        starters: names_from_attribute(map.get("starters")?)?,
        bench: names_from_attribute(map.get("bench")?)?,
    })
}
