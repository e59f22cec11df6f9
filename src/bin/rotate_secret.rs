#![recursion_limit = "256"]

use aws_config::BehaviorVersion;
use lambda_runtime::{Error, LambdaEvent, service_fn};
use match_lineup_bot::handler::rotate_secret::{self, RotateSecret};
use match_lineup_bot::rotation::RotationEvent;
use match_lineup_bot::settings::{self, RotationSettings};
use match_lineup_bot::logging;

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init();

    let settings: RotationSettings = settings::from_env()?;
    let aws = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let rotation = RotateSecret::new(settings, &aws);
    let rotation = &rotation;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<RotationEvent>| async move {
        rotate_secret::handler(rotation, event).await
    }))
    .await
}
