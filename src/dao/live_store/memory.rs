//! In-memory [`LiveScoreStore`] used by service tests.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use futures::future::BoxFuture;
use time::Date;
use uuid::Uuid;

use crate::dao::{
    live_store::LiveScoreStore,
    models::{GameRecordEntity, LiveScoreUpdateEntity},
    storage::{StorageError, StorageResult},
};

#[derive(Debug, thiserror::Error)]
#[error("memory store switched off")]
struct Unreachable;

/// Records every push and can be switched off to simulate an outage.
#[derive(Clone, Default)]
pub struct MemoryStore {
    games: Arc<Mutex<Vec<GameRecordEntity>>>,
    pushes: Arc<Mutex<Vec<(Uuid, LiveScoreUpdateEntity)>>>,
    down: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Store preloaded with `games`.
    pub fn with_games(games: Vec<GameRecordEntity>) -> Self {
        Self {
            games: Arc::new(Mutex::new(games)),
            ..Self::default()
        }
    }

    /// Every push received so far.
    pub fn pushes(&self) -> Vec<(Uuid, LiveScoreUpdateEntity)> {
        self.pushes.lock().unwrap().clone()
    }

    /// Make every call fail until switched back on.
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    fn check(&self) -> StorageResult<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(StorageError::unavailable(
                "memory store down".into(),
                Unreachable,
            ));
        }
        Ok(())
    }
}

impl LiveScoreStore for MemoryStore {
    fn list_games(
        &self,
        _from: Date,
        _to: Date,
    ) -> BoxFuture<'static, StorageResult<Vec<GameRecordEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store.check()?;
            Ok(store.games.lock().unwrap().clone())
        })
    }

    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameRecordEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store.check()?;
            let games = store.games.lock().unwrap();
            Ok(games.iter().find(|game| game.id == id).cloned())
        })
    }

    fn push_live_score(
        &self,
        id: Uuid,
        update: LiveScoreUpdateEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.check()?;
            store.pushes.lock().unwrap().push((id, update));
            Ok(())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.check() })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        self.health_check()
    }
}
