pub mod signing;

use std::collections::HashMap;
use std::future::Future;

use serde::de::DeserializeOwned;
use tracing::{debug, info_span, instrument};

use crate::error::Result;
use crate::model::fotmob::{MatchDetails, TeamDetails};

const BASE_URL: &str = "https://www.fotmob.com";
const AUTH_HEADER: &str = "x-mas";

/// Source of fixture and match data.
pub trait FootballData {
    fn team_details(&self, team_id: i64) -> impl Future<Output = Result<TeamDetails>> + Send;

    fn match_details(&self, match_id: i64) -> impl Future<Output = Result<MatchDetails>> + Send;
}

/// How requests to FotMob are authenticated.
#[derive(Debug, Clone)]
pub enum FotmobAuth {
    /// Sign each request the way the web client does.
    Signed,
    /// Send a header bundle issued by the token service and kept in Secrets Manager.
    Headers(HashMap<String, String>),
}

/// Blocking FotMob client. Async callers go through [`FootballData`].
#[derive(Debug, Clone)]
pub struct FotmobClient {
    base_url: String,
    auth: FotmobAuth,
}

impl FotmobClient {
    pub fn new(auth: FotmobAuth) -> Self {
        Self { base_url: BASE_URL.to_string(), auth }
    }

    /// GET a path under the base URL and decode the JSON body.
    #[instrument(level = "info", skip(self))]
    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = ureq::get(&url);
        match &self.auth {
            FotmobAuth::Signed => {
                let token = self.signed_token(path)?;
                request = request.header(AUTH_HEADER, &token);
            }
            FotmobAuth::Headers(headers) => {
                for (name, value) in headers {
                    request = request.header(name.as_str(), value.as_str());
                }
            }
        }

        let response = {
            let _span = info_span!("fotmob_fetch", url = %url).entered();
            request.call()?
        };
        let body = response.into_body().read_json::<T>()?;
        Ok(body)
    }

    fn signed_token(&self, path: &str) -> Result<String> {
        let homepage = ureq::get(&self.base_url).call()?.into_body().read_to_string()?;
        let version = signing::scrape_version(&homepage)?;
        debug!(version = %version, "Scraped FotMob client version");
        signing::auth_token(path, chrono::Utc::now().timestamp_millis(), &version)
    }
}

impl FootballData for FotmobClient {
    async fn team_details(&self, team_id: i64) -> Result<TeamDetails> {
        let client = self.clone();
        let path = format!("/api/teams?id={}", team_id);
        tokio::task::spawn_blocking(move || client.get::<TeamDetails>(&path)).await?
    }

    async fn match_details(&self, match_id: i64) -> Result<MatchDetails> {
        let client = self.clone();
        let path = format!("/api/matchDetails?matchId={}", match_id);
        tokio::task::spawn_blocking(move || client.get::<MatchDetails>(&path)).await?
    }
}
