use std::sync::Arc;

use tokio::sync::RwLock;

use crate::api::ProgressApi;
use crate::error::Result;
use crate::models::DailyQuestionSet;

/// Snapshot of today's curated problems. Fetched on page entry and after
/// every sync; only ever replaced, never edited in place.
pub struct DailyQuestionsCache<A> {
    api: Arc<A>,
    questions: RwLock<Option<DailyQuestionSet>>,
}

impl<A: ProgressApi> DailyQuestionsCache<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            questions: RwLock::new(None),
        }
    }

    pub async fn read(&self) -> Option<DailyQuestionSet> {
        self.questions.read().await.clone()
    }

    pub async fn refresh(&self) -> Result<DailyQuestionSet> {
        log::debug!("[refresh] fetching daily questions...");
        let set = self
            .api
            .fetch_daily_questions()
            .await
            .inspect_err(|err| {
                log::error!("[refresh] daily questions fetch failed, keeping cached set: {err}")
            })?;

        *self.questions.write().await = Some(set.clone());
        Ok(set)
    }

    pub async fn clear(&self) {
        log::debug!("[clear] dropping cached daily questions");
        *self.questions.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionStatus::{Completed, Unattempted};
    use crate::testutil::{sample_daily_set, FakeApi};

    #[tokio::test]
    async fn refresh_replaces_and_clear_empties() {
        let api = Arc::new(FakeApi::new());
        let cache = DailyQuestionsCache::new(api.clone());
        assert!(cache.read().await.is_none());

        cache.refresh().await.unwrap();
        assert!(cache.read().await.is_some());

        api.set_daily(sample_daily_set([Completed, Completed, Unattempted]));
        let set = cache.refresh().await.unwrap();
        assert_eq!(set.easy.status, Completed);

        cache.clear().await;
        assert!(cache.read().await.is_none());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_the_previous_set() {
        let api = Arc::new(FakeApi::new());
        let cache = DailyQuestionsCache::new(api.clone());
        cache.refresh().await.unwrap();

        api.fail_daily(true);
        assert!(cache.refresh().await.is_err());
        assert!(cache.read().await.is_some());
    }
}
