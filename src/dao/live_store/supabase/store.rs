use std::{sync::Arc, time::Duration};

use futures::future::BoxFuture;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use time::Date;
use uuid::Uuid;

use crate::dao::{
    live_store::LiveScoreStore,
    models::{GameRecordEntity, LiveScoreUpdateEntity},
    storage::{StorageError, StorageResult},
};

use super::{
    config::SupabaseConfig,
    error::{SupabaseError, SupabaseResult},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const LIST_COLUMNS: &str = "id,game_date,team1,team2,game_type,division,team1_score,team2_score,team1_color,team2_color,game_stage";

/// PostgREST client for the `game_league` table.
#[derive(Clone)]
pub struct SupabaseStore {
    client: Client,
    table_url: Arc<str>,
    api_key: Arc<str>,
}

impl SupabaseStore {
    /// Build the client and check that the table answers.
    pub async fn connect(config: SupabaseConfig) -> SupabaseResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| SupabaseError::ClientBuilder { source })?;

        let table_url = Arc::<str>::from(format!(
            "{}/rest/v1/{}",
            config.base_url.trim_end_matches('/'),
            config.table
        ));

        let store = Self {
            client,
            table_url,
            api_key: Arc::<str>::from(config.api_key),
        };

        store.ping().await?;
        Ok(store)
    }

    fn request(&self, method: Method) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.table_url.as_ref())
            .header("apikey", self.api_key.as_ref())
            .bearer_auth(self.api_key.as_ref())
    }

    async fn select<T>(&self, query: &[(&str, String)]) -> SupabaseResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::GET)
            .query(query)
            .send()
            .await
            .map_err(|source| SupabaseError::RequestSend {
                path: self.table_url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(SupabaseError::RequestStatus {
                path: self.table_url.to_string(),
                status: response.status(),
            });
        }

        response
            .json::<Vec<T>>()
            .await
            .map_err(|source| SupabaseError::DecodeResponse {
                path: self.table_url.to_string(),
                source,
            })
    }

    async fn ping(&self) -> SupabaseResult<()> {
        let response = self
            .request(Method::GET)
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await
            .map_err(|source| SupabaseError::RequestSend {
                path: self.table_url.to_string(),
                source,
            })?;

        match response.status() {
            status if status.is_success() => Ok(()),
            status => Err(SupabaseError::RequestStatus {
                path: self.table_url.to_string(),
                status,
            }),
        }
    }

    async fn patch_row(&self, id: Uuid, update: &LiveScoreUpdateEntity) -> SupabaseResult<()> {
        let response = self
            .request(Method::PATCH)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=minimal")
            .json(update)
            .send()
            .await
            .map_err(|source| SupabaseError::RequestSend {
                path: self.table_url.to_string(),
                source,
            })?;

        match response.status() {
            StatusCode::NO_CONTENT | StatusCode::OK => Ok(()),
            status => Err(SupabaseError::RequestStatus {
                path: self.table_url.to_string(),
                status,
            }),
        }
    }
}

impl LiveScoreStore for SupabaseStore {
    fn list_games(
        &self,
        from: Date,
        to: Date,
    ) -> BoxFuture<'static, StorageResult<Vec<GameRecordEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let query = [
                ("select", LIST_COLUMNS.to_string()),
                ("game_date", format!("gte.{}", iso_date(from))),
                ("game_date", format!("lte.{}", iso_date(to))),
                ("order", "game_date.asc".to_string()),
            ];
            store
                .select::<GameRecordEntity>(&query)
                .await
                .map_err(StorageError::from)
        })
    }

    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameRecordEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let query = [("select", "*".to_string()), ("id", format!("eq.{id}"))];
            let rows = store.select::<GameRecordEntity>(&query).await?;
            Ok(rows.into_iter().next())
        })
    }

    fn push_live_score(
        &self,
        id: Uuid,
        update: LiveScoreUpdateEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .patch_row(id, &update)
                .await
                .map_err(StorageError::from)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ping().await.map_err(StorageError::from) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        // PostgREST is stateless over HTTP; reconnecting is a fresh round-trip.
        self.health_check()
    }
}

/// `YYYY-MM-DD` as expected by PostgREST date filters.
fn iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
