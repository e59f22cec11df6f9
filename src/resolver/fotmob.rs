use tracing::instrument;

use crate::error::Result;
use crate::fotmob::FootballData;
use crate::model::fixture::{Lineup, LineupOrigin};
use crate::model::fotmob::{MatchDetails, Player};

use super::LineupResolver;

/// Reads the home side's lineup from FotMob match details.
#[derive(Debug, Clone)]
pub struct FotmobResolver<D> {
    data: D,
}

impl<D: FootballData> FotmobResolver<D> {
    pub fn new(data: D) -> Self {
        Self { data }
    }
}

/// Home starters and substitutes in the order FotMob lists them.
pub fn home_lineup(details: &MatchDetails) -> Option<Lineup> {
    let home = &details.content.lineup.as_ref()?.home_team;
    let names = |players: &[Player]| players.iter().map(|p| p.name.clone()).collect::<Vec<_>>();
    Some(Lineup { starters: names(&home.starters), bench: names(&home.subs) })
}

impl<D: FootballData + Sync> LineupResolver for FotmobResolver<D> {
    fn origin(&self) -> LineupOrigin {
        LineupOrigin::Fotmob
    }

    #[instrument(level = "info", skip(self))]
    async fn resolve(&self, match_id: i64) -> Result<Option<Lineup>> {
        let details = self.data.match_details(match_id).await?;
        Ok(home_lineup(&details))
    }
}
