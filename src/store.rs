//! Session-keyed caches and their wiring.
//!
//! Each store owns its state behind a single mutation entry point and is
//! handed around explicitly; nothing here is an ambient singleton.

pub mod daily;
pub mod session;
pub mod stats;

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::ProgressApi;
use crate::store::daily::DailyQuestionsCache;
use crate::store::session::SessionStatus;
use crate::store::stats::StatsCache;

/// Applies one session transition to the dependent caches: anonymous
/// clears both (no stale-user leakage), a newly authenticated identity
/// repopulates the stats cache.
pub async fn apply_session_change<A: ProgressApi>(
    stats: &StatsCache<A>,
    daily: &DailyQuestionsCache<A>,
    status: &SessionStatus,
) {
    if matches!(status, SessionStatus::Anonymous) {
        daily.clear().await;
    }
    stats.apply_session_change(status).await;
}

/// Keeps the caches in step with the session gate for as long as the
/// gate's sender side is alive.
pub fn spawn_session_listener<A>(
    stats: Arc<StatsCache<A>>,
    daily: Arc<DailyQuestionsCache<A>>,
    mut sessions: watch::Receiver<SessionStatus>,
) -> JoinHandle<()>
where
    A: ProgressApi + 'static,
{
    tokio::spawn(async move {
        while sessions.changed().await.is_ok() {
            let status = sessions.borrow_and_update().clone();
            log::debug!("[spawn_session_listener] session changed: {status}");
            apply_session_change(&stats, &daily, &status).await;
        }
    })
}
