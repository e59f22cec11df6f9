#![recursion_limit = "256"]

use aws_lambda_events::eventbridge::EventBridgeEvent;
use lambda_runtime::{Error, LambdaEvent, service_fn};
use match_lineup_bot::handler::make_call::{self, MakeCall};
use match_lineup_bot::model::fixture::LineupSet;
use match_lineup_bot::settings::{self, ExtensionSettings, MakeCallSettings};
use match_lineup_bot::logging;

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init();

    let settings: MakeCallSettings = settings::from_env()?;
    let extension: ExtensionSettings = settings::from_env()?;
    let call = MakeCall::new(settings, &extension);
    let call = &call;

    lambda_runtime::run(service_fn(
        move |event: LambdaEvent<EventBridgeEvent<LineupSet>>| async move {
            make_call::handler(call, event).await
        },
    ))
    .await
}
