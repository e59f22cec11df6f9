use std::future::Future;

use aws_sdk_scheduler::Client;
use aws_sdk_scheduler::primitives::DateTime as AwsDateTime;
use aws_sdk_scheduler::types::{
    ActionAfterCompletion, FlexibleTimeWindow, FlexibleTimeWindowMode, RetryPolicy, Target,
};
use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::error::Result;

/// Every check fires once a minute while its window is open.
pub const CHECK_RATE: &str = "rate(1 minute)";
pub const CHECK_RETRY_ATTEMPTS: i32 = 1;

/// A time-boxed recurring invocation of a lineup resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledCheck {
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub target_arn: String,
    pub payload: serde_json::Value,
}

pub trait ScheduleRegistrar {
    fn register(&self, check: &ScheduledCheck) -> impl Future<Output = Result<()>> + Send;
}

/// Registers checks with EventBridge Scheduler.
/// Schedules delete themselves once their end date passes.
#[derive(Debug, Clone)]
pub struct EventBridgeScheduler {
    client: Client,
    group_name: String,
    role_arn: String,
}

impl EventBridgeScheduler {
    pub fn new(client: Client, group_name: impl Into<String>, role_arn: impl Into<String>) -> Self {
        Self { client, group_name: group_name.into(), role_arn: role_arn.into() }
    }
}

impl ScheduleRegistrar for EventBridgeScheduler {
    #[instrument(
        level = "info",
        skip(self, check),
        fields(name = %check.name, start = %check.start, end = %check.end)
    )]
    async fn register(&self, check: &ScheduledCheck) -> Result<()> {
        let target = Target::builder()
            .arn(&check.target_arn)
            .role_arn(&self.role_arn)
            .input(serde_json::to_string(&check.payload)?)
            .retry_policy(
                RetryPolicy::builder().maximum_retry_attempts(CHECK_RETRY_ATTEMPTS).build(),
            )
            .build()?;
        let window = FlexibleTimeWindow::builder().mode(FlexibleTimeWindowMode::Off).build()?;

        self.client
            .create_schedule()
            .name(&check.name)
            .group_name(&self.group_name)
            .flexible_time_window(window)
            .start_date(AwsDateTime::from_secs(check.start.timestamp()))
            .end_date(AwsDateTime::from_secs(check.end.timestamp()))
            .schedule_expression(CHECK_RATE)
            .action_after_completion(ActionAfterCompletion::Delete)
            .target(target)
            .send()
            .await
            .map_err(aws_sdk_scheduler::Error::from)?;

        info!("Registered scheduled check");
        Ok(())
    }
}
