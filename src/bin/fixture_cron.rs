#![recursion_limit = "256"]

use aws_config::BehaviorVersion;
use lambda_runtime::{Error, LambdaEvent, service_fn};
use match_lineup_bot::handler::fixture_cron;
use match_lineup_bot::settings::{self, FixtureCronSettings};
use match_lineup_bot::logging;

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init();

    let settings: FixtureCronSettings = settings::from_env()?;
    let aws = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let cron = fixture_cron::build(settings, &aws);
    let cron = &cron;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<serde_json::Value>| async move {
        fixture_cron::handler(cron, event).await
    }))
    .await
}
