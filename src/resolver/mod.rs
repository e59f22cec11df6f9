pub mod fotmob;
pub mod vision;

use std::future::Future;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::events::EventPublisher;
use crate::model::fixture::{Lineup, LineupOrigin, LineupSet};
use crate::store::FixtureStore;

/// Something that can work out a match's lineup, or tell that it is not out yet.
pub trait LineupResolver {
    fn origin(&self) -> LineupOrigin;

    fn resolve(&self, match_id: i64) -> impl Future<Output = Result<Option<Lineup>>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckOutcome {
    AlreadySet,
    NotFound,
    Published { lineup: Lineup },
}

/// One scheduled tick of a lineup check.
///
/// A lineup is written at most once. It is announced by the tick that wrote it, or by a
/// later tick when that announcement failed, and marked announced only after the bus
/// accepted the event.
#[instrument(
    level = "info",
    skip(resolver, store, publisher),
    fields(origin = resolver.origin().source())
)]
pub async fn check_lineup<R, S, P>(
    resolver: &R,
    store: &S,
    publisher: &P,
    match_id: i64,
) -> Result<CheckOutcome>
where
    R: LineupResolver,
    S: FixtureStore,
    P: EventPublisher,
{
    let lineup = match store.lineup(match_id).await? {
        Some(stored) if stored.announced => {
            info!("Lineup already set");
            return Ok(CheckOutcome::AlreadySet);
        }
        Some(stored) => {
            warn!("Stored lineup was never announced, announcing it now");
            stored.lineup
        }
        None => {
            let Some(lineup) = resolver.resolve(match_id).await? else {
                info!("Lineup not available yet");
                return Ok(CheckOutcome::NotFound);
            };
            if !store.set_lineup_if_absent(match_id, &lineup).await? {
                return Ok(CheckOutcome::AlreadySet);
            }
            lineup
        }
    };

    publisher
        .publish(resolver.origin(), &LineupSet::new(match_id, &lineup))
        .await?;
    store.mark_announced(match_id).await?;
    info!(
        starters = lineup.starters.len(),
        bench = lineup.bench.len(),
        "Lineup stored and announced"
    );
    Ok(CheckOutcome::Published { lineup })
}
