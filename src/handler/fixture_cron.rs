use aws_config::SdkConfig;
use lambda_runtime::{Error, LambdaEvent};
use tracing::{info, instrument};

use crate::fotmob::{FotmobAuth, FotmobClient};
use crate::orchestrator::{Orchestrator, ScheduleOutcome};
use crate::scheduler::EventBridgeScheduler;
use crate::settings::FixtureCronSettings;
use crate::store::DynamoFixtureStore;

pub type FixtureCron = Orchestrator<FotmobClient, DynamoFixtureStore, EventBridgeScheduler>;

/// Wire the orchestrator to FotMob, DynamoDB and EventBridge Scheduler.
pub fn build(settings: FixtureCronSettings, aws: &SdkConfig) -> FixtureCron {
    let store =
        DynamoFixtureStore::new(aws_sdk_dynamodb::Client::new(aws), settings.table_name.clone());
    let registrar = EventBridgeScheduler::new(
        aws_sdk_scheduler::Client::new(aws),
        settings.schedule_group_name.clone(),
        settings.scheduler_role_arn.clone(),
    );
    Orchestrator::new(FotmobClient::new(FotmobAuth::Signed), store, registrar, settings)
}

/// The daily schedule sends an empty payload, so the event body is ignored.
#[instrument(skip(cron, event), fields(request_id = %event.context.request_id))]
pub async fn handler(
    cron: &FixtureCron,
    event: LambdaEvent<serde_json::Value>,
) -> Result<ScheduleOutcome, Error> {
    let outcome = cron.run(chrono::Utc::now()).await?;
    info!(?outcome, "Fixture check finished");
    Ok(outcome)
}
