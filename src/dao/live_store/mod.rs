#[cfg(test)]
pub mod memory;
#[cfg(feature = "supabase-store")]
pub mod supabase;

use crate::dao::models::{GameRecordEntity, LiveScoreUpdateEntity};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;
use time::Date;
use uuid::Uuid;

/// Abstraction over the remote store feeding the game list and the web viewer.
pub trait LiveScoreStore: Send + Sync {
    /// Games dated within `[from, to]`, ordered by date.
    fn list_games(
        &self,
        from: Date,
        to: Date,
    ) -> BoxFuture<'static, StorageResult<Vec<GameRecordEntity>>>;
    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameRecordEntity>>>;
    fn push_live_score(
        &self,
        id: Uuid,
        update: LiveScoreUpdateEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
