use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::api::ProgressApi;
use crate::error::Result;
use crate::models::UserProgressSnapshot;
use crate::store::session::SessionStatus;

/// In-memory snapshot of the user's progress entity, keyed implicitly to
/// the current session.
///
/// `refresh` is the only writer path; it replaces the snapshot wholesale
/// so readers never observe a partial update. A failed refresh leaves
/// the previous snapshot in place (stale but available).
pub struct StatsCache<A> {
    api: Arc<A>,
    snapshot: RwLock<Option<UserProgressSnapshot>>,
    // Identity the cache was last populated for; guards against
    // re-fetching on repeated reports of the same login.
    last_identity: Mutex<Option<String>>,
}

impl<A: ProgressApi> StatsCache<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            snapshot: RwLock::new(None),
            last_identity: Mutex::new(None),
        }
    }

    /// Last successfully fetched snapshot, or `None` when nothing has
    /// loaded yet. Never touches the network.
    pub async fn read(&self) -> Option<UserProgressSnapshot> {
        self.snapshot.read().await.clone()
    }

    /// Fetches a fresh snapshot and swaps it in atomically. On failure
    /// the cached value is untouched and the error goes to the caller.
    pub async fn refresh(&self) -> Result<UserProgressSnapshot> {
        log::debug!("[refresh] fetching user stats...");
        let snapshot = self
            .api
            .fetch_stats()
            .await
            .inspect_err(|err| {
                log::error!("[refresh] stats fetch failed, keeping cached snapshot: {err}")
            })?;

        *self.snapshot.write().await = Some(snapshot.clone());
        Ok(snapshot)
    }

    pub async fn clear(&self) {
        log::debug!("[clear] dropping cached stats");
        *self.snapshot.write().await = None;
        *self.last_identity.lock().await = None;
    }

    /// Reacts to a session transition: anonymous empties the cache, a
    /// *new* authenticated identity triggers exactly one refresh.
    /// Repeated reports of the same identity are no-ops.
    pub async fn apply_session_change(&self, status: &SessionStatus) {
        match status {
            SessionStatus::Anonymous => self.clear().await,
            SessionStatus::Authenticated(user) => {
                {
                    let mut last = self.last_identity.lock().await;
                    if last.as_deref() == Some(user.id.as_str()) {
                        return;
                    }
                    *last = Some(user.id.clone());
                }

                if let Err(err) = self.refresh().await {
                    log::error!("[apply_session_change] initial stats load failed: {err}");
                }
            }
        }
    }
}
