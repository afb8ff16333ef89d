//! Shared fakes for the unit tests: an in-memory `ProgressApi` with
//! failure toggles and call counters, plus sample model values.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::api::{DifficultyUpdate, ProgressApi};
use crate::error::{Error, Result};
use crate::models::{
    Achievement, DailyQuestion, DailyQuestionSet, DifficultyMode, InventoryItem, Margins,
    ProblemSetPreference, QuestionStatus, UserIdentity, UserProgressSnapshot,
};

pub(crate) fn sample_identity(id: &str) -> UserIdentity {
    UserIdentity {
        id: id.into(),
        email: format!("{id}@example.com"),
        name: "Dev User".into(),
        picture: None,
        provider: Some("dev".into()),
    }
}

pub(crate) fn sample_snapshot() -> UserProgressSnapshot {
    UserProgressSnapshot {
        gamcoins: 320,
        total_xp: 250,
        current_streak: 4,
        max_streak: 7,
        problems_solved: 23,
        lifetime_loss: 250,
        available_balance: 485,
        lives: 3,
        problems_since_last_life: 1,
        difficulty_mode: DifficultyMode::Normal,
        daily_risk_amount: 100,
        risk_locked: false,
        powerups_used_today: 0,
        leetcode_connected: true,
        zerodha_connected: true,
        leetcode_username: Some("dev".into()),
        name: Some("Dev User".into()),
        email: Some("dev@example.com".into()),
        last_activity_date: None,
    }
}

fn question(title: &str, slug: &str, difficulty: &str, status: QuestionStatus) -> DailyQuestion {
    DailyQuestion {
        title: title.into(),
        topics: "Array, Hash Table".into(),
        slug: slug.into(),
        difficulty: difficulty.into(),
        status,
    }
}

pub(crate) fn sample_daily_set(statuses: [QuestionStatus; 3]) -> DailyQuestionSet {
    DailyQuestionSet {
        easy: question("Two Sum", "two-sum", "easy", statuses[0]),
        medium: question(
            "Longest Substring Without Repeating Characters",
            "longest-substring-without-repeating-characters",
            "medium",
            statuses[1],
        ),
        hard: question(
            "Median of Two Sorted Arrays",
            "median-of-two-sorted-arrays",
            "hard",
            statuses[2],
        ),
        daily_challenge: None,
    }
}

#[derive(Default)]
pub(crate) struct FakeApi {
    user: Mutex<Option<UserIdentity>>,
    stats: Mutex<Option<UserProgressSnapshot>>,
    daily: Mutex<Option<DailyQuestionSet>>,
    last_difficulty: Mutex<Option<DifficultyUpdate>>,

    fail_user: AtomicBool,
    fail_logout: AtomicBool,
    fail_stats: AtomicBool,
    fail_daily: AtomicBool,
    fail_sync: AtomicBool,

    stats_calls: AtomicU32,
    daily_calls: AtomicU32,
    sync_calls: AtomicU32,
    difficulty_calls: AtomicU32,
    purchase_calls: AtomicU32,

    sync_blocked: AtomicBool,
    sync_gate: Notify,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_user(&self, user: Option<UserIdentity>) {
        *self.user.lock().unwrap() = user;
    }

    pub fn set_stats(&self, snapshot: UserProgressSnapshot) {
        *self.stats.lock().unwrap() = Some(snapshot);
    }

    pub fn set_daily(&self, set: DailyQuestionSet) {
        *self.daily.lock().unwrap() = Some(set);
    }

    pub fn current_stats(&self) -> UserProgressSnapshot {
        self.stats
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(sample_snapshot)
    }

    pub fn fail_user(&self, fail: bool) {
        self.fail_user.store(fail, Ordering::SeqCst);
    }

    pub fn fail_logout(&self, fail: bool) {
        self.fail_logout.store(fail, Ordering::SeqCst);
    }

    pub fn fail_stats(&self, fail: bool) {
        self.fail_stats.store(fail, Ordering::SeqCst);
    }

    pub fn fail_daily(&self, fail: bool) {
        self.fail_daily.store(fail, Ordering::SeqCst);
    }

    pub fn fail_sync(&self, fail: bool) {
        self.fail_sync.store(fail, Ordering::SeqCst);
    }

    /// Makes `sync_progress` park until [`release_sync`] is called,
    /// simulating the slow upstream scrape.
    pub fn block_sync(&self, block: bool) {
        self.sync_blocked.store(block, Ordering::SeqCst);
    }

    pub fn release_sync(&self) {
        self.sync_blocked.store(false, Ordering::SeqCst);
        self.sync_gate.notify_one();
    }

    pub fn stats_calls(&self) -> u32 {
        self.stats_calls.load(Ordering::SeqCst)
    }

    pub fn daily_calls(&self) -> u32 {
        self.daily_calls.load(Ordering::SeqCst)
    }

    pub fn sync_calls(&self) -> u32 {
        self.sync_calls.load(Ordering::SeqCst)
    }

    pub fn difficulty_calls(&self) -> u32 {
        self.difficulty_calls.load(Ordering::SeqCst)
    }

    pub fn purchase_calls(&self) -> u32 {
        self.purchase_calls.load(Ordering::SeqCst)
    }

    pub fn last_difficulty_update(&self) -> Option<DifficultyUpdate> {
        self.last_difficulty.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProgressApi for FakeApi {
    async fn current_user(&self) -> Result<Option<UserIdentity>> {
        if self.fail_user.load(Ordering::SeqCst) {
            return Err(Error::Transport("connection refused".into()));
        }
        Ok(self.user.lock().unwrap().clone())
    }

    async fn login_google(&self, _token: &str) -> Result<()> {
        Ok(())
    }

    async fn login_dev(&self, email: &str) -> Result<()> {
        self.set_user(Some(sample_identity(email)));
        Ok(())
    }

    async fn logout(&self) -> Result<()> {
        if self.fail_logout.load(Ordering::SeqCst) {
            return Err(Error::Transport("connection refused".into()));
        }
        self.set_user(None);
        Ok(())
    }

    async fn fetch_stats(&self) -> Result<UserProgressSnapshot> {
        self.stats_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_stats.load(Ordering::SeqCst) {
            return Err(Error::Transport("HTTP 500 on /user/stats".into()));
        }
        Ok(self.current_stats())
    }

    async fn fetch_daily_questions(&self) -> Result<DailyQuestionSet> {
        self.daily_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_daily.load(Ordering::SeqCst) {
            return Err(Error::Transport("HTTP 500 on /daily-questions".into()));
        }
        let set = self.daily.lock().unwrap().clone();
        Ok(set.unwrap_or_else(|| sample_daily_set(Default::default())))
    }

    async fn sync_progress(&self) -> Result<()> {
        self.sync_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_sync.load(Ordering::SeqCst) {
            return Err(Error::Transport("HTTP 502 on /user/sync".into()));
        }
        if self.sync_blocked.load(Ordering::SeqCst) {
            self.sync_gate.notified().await;
        }
        Ok(())
    }

    async fn update_difficulty(&self, update: &DifficultyUpdate) -> Result<()> {
        self.difficulty_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_difficulty.lock().unwrap() = Some(update.clone());
        Ok(())
    }

    async fn fetch_margins(&self) -> Result<Margins> {
        Ok(Margins {
            available: 12_450.0,
            used: 0.0,
        })
    }

    async fn fetch_inventory(&self) -> Result<Vec<InventoryItem>> {
        Ok(vec![])
    }

    async fn fetch_achievements(&self) -> Result<Vec<Achievement>> {
        Ok(vec![])
    }

    async fn purchase_powerup(&self, _powerup_id: &str) -> Result<()> {
        self.purchase_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn fetch_preference(&self) -> Result<ProblemSetPreference> {
        Ok(ProblemSetPreference::Default)
    }

    async fn update_preference(&self, _pref: &ProblemSetPreference) -> Result<()> {
        Ok(())
    }
}
