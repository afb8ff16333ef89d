use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::api::ProgressApi;
use crate::error::{Error, Result};
use crate::models::{DailyQuestionSet, UserProgressSnapshot};
use crate::store::daily::DailyQuestionsCache;
use crate::store::stats::StatsCache;

/// User-triggered reconciliation with the external judge.
///
/// Asks the backend to pull the latest solve data upstream, then
/// refreshes the stats and daily-questions caches together. Exactly one
/// run may be in flight per instance: the upstream pull awards XP and
/// penalties, so a duplicate request from a rapid second click would
/// double-count on the backend.
pub struct SyncOperation<A> {
    api: Arc<A>,
    stats: Arc<StatsCache<A>>,
    daily: Arc<DailyQuestionsCache<A>>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag on every exit path, including errors.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<A: ProgressApi> SyncOperation<A> {
    pub fn new(
        api: Arc<A>,
        stats: Arc<StatsCache<A>>,
        daily: Arc<DailyQuestionsCache<A>>,
    ) -> Self {
        Self {
            api,
            stats,
            daily,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Runs one sync: upstream reconciliation, then both cache
    /// refreshes concurrently. Returns the refreshed progress snapshot
    /// and problem set.
    ///
    /// A failed reconciliation aborts before any refresh. A refresh
    /// failure after a successful reconciliation is reported but the
    /// reconciliation is not rolled back; it already committed.
    pub async fn run(&self) -> Result<(UserProgressSnapshot, DailyQuestionSet)> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            log::info!("[run] sync already in progress, rejecting");
            return Err(Error::Validation("a sync is already in progress".into()));
        }
        let _guard = InFlightGuard(&self.in_flight);

        log::info!("[run] reconciling with the external judge...");
        self.api
            .sync_progress()
            .await
            .inspect_err(|err| log::error!("[run] upstream sync failed: {err}"))?;

        let (snapshot, questions) = tokio::join!(self.stats.refresh(), self.daily.refresh());
        let result = (snapshot?, questions?);

        log::info!("[run] sync complete");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeApi;

    fn operation(api: &Arc<FakeApi>) -> SyncOperation<FakeApi> {
        SyncOperation::new(
            api.clone(),
            Arc::new(StatsCache::new(api.clone())),
            Arc::new(DailyQuestionsCache::new(api.clone())),
        )
    }

    #[tokio::test]
    async fn a_second_invocation_does_not_hit_upstream_twice() {
        let api = Arc::new(FakeApi::new());
        api.block_sync(true);
        let op = Arc::new(operation(&api));

        let first = tokio::spawn({
            let op = op.clone();
            async move { op.run().await }
        });

        // Let the first run reach the upstream call and park there.
        while api.sync_calls() == 0 {
            tokio::task::yield_now().await;
        }

        let rejected = op.run().await;
        assert!(matches!(rejected, Err(Error::Validation(_))));
        assert_eq!(api.sync_calls(), 1);

        api.release_sync();
        first.await.unwrap().unwrap();

        // Once resolved, a new run is allowed again.
        op.run().await.unwrap();
        assert_eq!(api.sync_calls(), 2);
    }

    #[tokio::test]
    async fn upstream_failure_aborts_before_any_refresh() {
        let api = Arc::new(FakeApi::new());
        api.fail_sync(true);
        let op = operation(&api);

        assert!(op.run().await.is_err());
        assert_eq!(api.stats_calls(), 0);
        assert_eq!(api.daily_calls(), 0);

        // The guard released on the error path.
        assert!(!op.is_in_flight());
        api.fail_sync(false);
        op.run().await.unwrap();
    }

    #[tokio::test]
    async fn refresh_failure_reports_but_does_not_roll_back() {
        let api = Arc::new(FakeApi::new());
        api.fail_stats(true);
        let op = operation(&api);

        assert!(op.run().await.is_err());
        // The upstream reconciliation did run.
        assert_eq!(api.sync_calls(), 1);
        assert!(!op.is_in_flight());
    }

    #[tokio::test]
    async fn successful_run_returns_the_refreshed_pair() {
        let api = Arc::new(FakeApi::new());
        let op = operation(&api);

        let (snapshot, questions) = op.run().await.unwrap();
        assert_eq!(snapshot.gamcoins, api.current_stats().gamcoins);
        assert_eq!(questions.easy.slug, "two-sum");
        assert_eq!(api.stats_calls(), 1);
        assert_eq!(api.daily_calls(), 1);
    }
}
