#![recursion_limit = "256"]

use aws_config::BehaviorVersion;
use lambda_runtime::{Error, LambdaEvent, service_fn};
use match_lineup_bot::handler::ai_check_lineup::{self, AiCheckLineup, Request};
use match_lineup_bot::settings::{self, AiCheckLineupSettings, ExtensionSettings};
use match_lineup_bot::logging;

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init();

    let settings: AiCheckLineupSettings = settings::from_env()?;
    let extension: ExtensionSettings = settings::from_env()?;
    let aws = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let check = AiCheckLineup::new(settings, &extension, &aws);
    let check = &check;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Request>| async move {
        ai_check_lineup::handler(check, event).await
    }))
    .await
}
