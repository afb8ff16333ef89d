use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Accountability strictness tier. Governs lives and penalty severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyMode {
    Sandbox,
    #[default]
    Normal,
    Hardcore,
    God,
}

impl DifficultyMode {
    /// Upper bound on `lives` for this mode. `None` where the lives
    /// system does not apply (sandbox has no penalties, god mode is
    /// direct-penalty-only).
    pub fn max_lives(self) -> Option<u32> {
        match self {
            DifficultyMode::Normal => Some(5),
            DifficultyMode::Hardcore => Some(1),
            DifficultyMode::Sandbox | DifficultyMode::God => None,
        }
    }

    /// Whether missed challenges are absorbed by lives before any
    /// penalty fires.
    pub fn tracks_lives(self) -> bool {
        matches!(self, DifficultyMode::Normal | DifficultyMode::Hardcore)
    }

    /// Daily powerup-usage cap, where one exists.
    pub fn powerup_cap(self) -> Option<u32> {
        match self {
            DifficultyMode::Hardcore => Some(1),
            _ => None,
        }
    }
}

impl std::fmt::Display for DifficultyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DifficultyMode::Sandbox => "sandbox",
            DifficultyMode::Normal => "normal",
            DifficultyMode::Hardcore => "hardcore",
            DifficultyMode::God => "god",
        };
        write!(f, "{name}")
    }
}

/// The user's derived progress entity, as served by `GET /user/stats`.
///
/// Owned by the stats cache and replaced wholesale on every refresh;
/// nothing mutates it field-by-field.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProgressSnapshot {
    pub gamcoins: u64,
    pub total_xp: u64,
    pub current_streak: u64,
    pub max_streak: u64,
    pub problems_solved: u64,
    pub lifetime_loss: u64,
    pub available_balance: i64,
    pub lives: u32,
    pub problems_since_last_life: u32,
    pub difficulty_mode: DifficultyMode,
    pub daily_risk_amount: u64,
    pub risk_locked: bool,
    pub powerups_used_today: u32,
    pub leetcode_connected: bool,
    #[serde(default)]
    pub zerodha_connected: bool,

    // Display-only fields, no invariants.
    #[serde(default)]
    pub leetcode_username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub last_activity_date: Option<NaiveDate>,
}

impl std::fmt::Display for UserProgressSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "**Progress:**\n\
             \tGamCoins: {}\n\
             \tTotal XP: {}\n\
             \tStreak: {} (best {})\n\
             \tProblems Solved: {}\n\
             \tLives: {}\n\
             \tMode: {}\n\
             \tLifetime Loss: Rs {}\n\
             \tBalance: Rs {}",
            self.gamcoins,
            self.total_xp,
            self.current_streak,
            self.max_streak,
            self.problems_solved,
            self.lives,
            self.difficulty_mode,
            self.lifetime_loss,
            self.available_balance,
        )
    }
}

/// Attempt state of a curated daily problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuestionStatus {
    #[default]
    Unattempted,
    Attempted,
    Completed,
}

/// One curated problem descriptor. `topics` stays a comma-joined keyword
/// string exactly as the backend serves it.
#[derive(Debug, Clone, Deserialize)]
pub struct DailyQuestion {
    pub title: String,
    #[serde(default)]
    pub topics: String,
    pub slug: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub status: QuestionStatus,
}

impl DailyQuestion {
    /// Splits the comma-joined keyword string into tags.
    pub fn tags(&self) -> Vec<&str> {
        self.topics
            .split(", ")
            .filter(|tag| !tag.is_empty())
            .collect()
    }
}

impl std::fmt::Display for DailyQuestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "**{}** ({})\n\
            https://leetcode.com/problems/{}\n\
            \tTopics: {}\n\
            \tStatus: {:?}",
            self.title, self.difficulty, self.slug, self.topics, self.status
        )
    }
}

/// The separate daily-challenge descriptor with its own direct link.
#[derive(Debug, Clone, Deserialize)]
pub struct DailyChallenge {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub status: QuestionStatus,
}

/// Today's curated problem set. Fetched fresh on entry and after every
/// sync; never mutated locally except by replacement.
#[derive(Debug, Clone, Deserialize)]
pub struct DailyQuestionSet {
    pub easy: DailyQuestion,
    pub medium: DailyQuestion,
    pub hard: DailyQuestion,
    #[serde(default)]
    pub daily_challenge: Option<DailyChallenge>,
}

/// Which pool the curated daily problems are drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProblemSetPreference {
    Default,
    Topics(Vec<String>),
    Sheet(String),
}

impl ProblemSetPreference {
    /// Topic-filtered pool. The topic list must be non-empty.
    pub fn topics(topics: Vec<String>) -> Result<Self> {
        if topics.is_empty() {
            return Err(Error::Validation(
                "a topics preference needs at least one topic".into(),
            ));
        }
        Ok(ProblemSetPreference::Topics(topics))
    }

    /// Curated-sheet pool. The sheet id must be non-empty.
    pub fn sheet(sheet: impl Into<String>) -> Result<Self> {
        let sheet = sheet.into();
        if sheet.is_empty() {
            return Err(Error::Validation("a sheet preference needs a sheet id".into()));
        }
        Ok(ProblemSetPreference::Sheet(sheet))
    }
}

/// A purchased powerup sitting in the user's inventory.
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryItem {
    pub item_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub rarity: Rarity,
    pub unlocked: bool,
    #[serde(default)]
    pub progress: Option<u32>,
    #[serde(default)]
    pub target: Option<u32>,
}

/// Identity resolved by `GET /auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
}

/// External brokerage balance. Read-only display input; carries no
/// invariants and is not part of the progress snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct Margins {
    #[serde(default)]
    pub available: f64,
    #[serde(default)]
    pub used: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_snapshot_deserializes_from_backend_shape() {
        let raw = r#"{
            "gamcoins": 320,
            "total_xp": 250,
            "current_streak": 4,
            "max_streak": 7,
            "problems_solved": 23,
            "lifetime_loss": 250,
            "available_balance": -120,
            "lives": 3,
            "problems_since_last_life": 1,
            "difficulty_mode": "hardcore",
            "daily_risk_amount": 100,
            "risk_locked": true,
            "powerups_used_today": 1,
            "leetcode_connected": true,
            "zerodha_connected": false,
            "name": "Dev User",
            "email": "dev@example.com",
            "last_activity_date": "2026-08-06"
        }"#;

        let snapshot: UserProgressSnapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snapshot.difficulty_mode, DifficultyMode::Hardcore);
        assert_eq!(snapshot.available_balance, -120);
        assert!(snapshot.risk_locked);
        assert_eq!(
            snapshot.last_activity_date,
            NaiveDate::from_ymd_opt(2026, 8, 6)
        );
    }

    #[test]
    fn daily_question_splits_topics_into_tags() {
        let question: DailyQuestion = serde_json::from_str(
            r#"{"title": "Two Sum", "topics": "Array, Hash Table", "slug": "two-sum",
                "difficulty": "easy", "status": "attempted"}"#,
        )
        .unwrap();

        assert_eq!(question.tags(), vec!["Array", "Hash Table"]);
        assert_eq!(question.status, QuestionStatus::Attempted);
    }

    #[test]
    fn preference_constructors_enforce_payload_invariants() {
        assert!(ProblemSetPreference::topics(vec![]).is_err());
        assert!(ProblemSetPreference::sheet("").is_err());

        let pref = ProblemSetPreference::topics(vec!["Graphs".into()]).unwrap();
        assert_eq!(pref, ProblemSetPreference::Topics(vec!["Graphs".into()]));
        assert_eq!(
            ProblemSetPreference::sheet("neetcode150").unwrap(),
            ProblemSetPreference::Sheet("neetcode150".into())
        );
    }

    #[test]
    fn mode_bounds_follow_the_difficulty_tier() {
        assert_eq!(DifficultyMode::Normal.max_lives(), Some(5));
        assert_eq!(DifficultyMode::Hardcore.max_lives(), Some(1));
        assert_eq!(DifficultyMode::God.max_lives(), None);
        assert!(!DifficultyMode::God.tracks_lives());
        assert_eq!(DifficultyMode::Hardcore.powerup_cap(), Some(1));
        assert_eq!(DifficultyMode::Normal.powerup_cap(), None);
    }
}
