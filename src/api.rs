pub mod client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{
    Achievement, DailyQuestionSet, DifficultyMode, InventoryItem, Margins, ProblemSetPreference,
    UserIdentity, UserProgressSnapshot,
};

/// Decides whether a response status means the session expired out from
/// under us. A 401 on the entry page is ordinary "not logged in" and must
/// not trigger the expiry effect, or we would redirect in a loop.
///
/// Pure classification; the effect (notice + redirect) lives on the
/// client as a registered hook.
pub fn is_session_expiry(status: u16, at_entry_point: bool) -> bool {
    status == 401 && !at_entry_point
}

/// Combined difficulty/risk update for `POST /user/difficulty`.
///
/// Mode, amount and lock travel in one write so no observer ever sees a
/// locked flag alongside an uncommitted amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DifficultyUpdate {
    pub difficulty_mode: DifficultyMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_risk_amount: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_locked: Option<bool>,
}

/// Wire shape of `/problems/preference` in both directions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceWire {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
}

impl TryFrom<PreferenceWire> for ProblemSetPreference {
    type Error = Error;

    fn try_from(wire: PreferenceWire) -> Result<Self> {
        match wire.kind.as_str() {
            "default" => Ok(ProblemSetPreference::Default),
            "topics" => wire
                .topics
                .filter(|topics| !topics.is_empty())
                .map(ProblemSetPreference::Topics)
                .ok_or_else(|| {
                    Error::Validation("topics preference arrived without topics".into())
                }),
            "sheet" => wire
                .sheet
                .filter(|sheet| !sheet.is_empty())
                .map(ProblemSetPreference::Sheet)
                .ok_or_else(|| Error::Validation("sheet preference arrived without a sheet".into())),
            other => Err(Error::Validation(format!(
                "unknown preference type: {other}"
            ))),
        }
    }
}

impl From<&ProblemSetPreference> for PreferenceWire {
    fn from(pref: &ProblemSetPreference) -> Self {
        match pref {
            ProblemSetPreference::Default => PreferenceWire {
                kind: "default".into(),
                topics: None,
                sheet: None,
            },
            ProblemSetPreference::Topics(topics) => PreferenceWire {
                kind: "topics".into(),
                topics: Some(topics.clone()),
                sheet: None,
            },
            ProblemSetPreference::Sheet(sheet) => PreferenceWire {
                kind: "sheet".into(),
                topics: None,
                sheet: Some(sheet.clone()),
            },
        }
    }
}

/// The backend contract consumed by the progress core.
///
/// One method per endpoint. The reqwest implementation lives in
/// [`client::ApiClient`]; tests substitute fakes.
#[async_trait]
pub trait ProgressApi: Send + Sync {
    /// `GET /auth/me`. `Ok(None)` means no live session.
    async fn current_user(&self) -> Result<Option<UserIdentity>>;

    /// `POST /auth/google`.
    async fn login_google(&self, token: &str) -> Result<()>;

    /// `POST /auth/dev-login`.
    async fn login_dev(&self, email: &str) -> Result<()>;

    /// `POST /auth/logout`.
    async fn logout(&self) -> Result<()>;

    /// `GET /user/stats`.
    async fn fetch_stats(&self) -> Result<UserProgressSnapshot>;

    /// `GET /daily-questions`.
    async fn fetch_daily_questions(&self) -> Result<DailyQuestionSet>;

    /// `POST /user/sync`. Asks the backend to pull fresh solve data
    /// from the external judge. Slow; seconds, not milliseconds.
    async fn sync_progress(&self) -> Result<()>;

    /// `POST /user/difficulty`.
    async fn update_difficulty(&self, update: &DifficultyUpdate) -> Result<()>;

    /// `GET /user/margins`.
    async fn fetch_margins(&self) -> Result<Margins>;

    /// `GET /user/inventory`.
    async fn fetch_inventory(&self) -> Result<Vec<InventoryItem>>;

    /// `GET /user/achievements`.
    async fn fetch_achievements(&self) -> Result<Vec<Achievement>>;

    /// `POST /user/purchase-powerup`. Debits gamcoins server-side; the
    /// caller is responsible for refreshing the stats cache afterwards.
    async fn purchase_powerup(&self, powerup_id: &str) -> Result<()>;

    /// `GET /problems/preference`.
    async fn fetch_preference(&self) -> Result<ProblemSetPreference>;

    /// `POST /problems/preference`.
    async fn update_preference(&self, pref: &ProblemSetPreference) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_classification_ignores_the_entry_point() {
        assert!(is_session_expiry(401, false));
        assert!(!is_session_expiry(401, true));
        assert!(!is_session_expiry(500, false));
        assert!(!is_session_expiry(200, false));
    }

    #[test]
    fn preference_wire_round_trips_through_the_enum() {
        let wire = PreferenceWire {
            kind: "topics".into(),
            topics: Some(vec!["Array".into(), "Graphs".into()]),
            sheet: None,
        };
        let pref = ProblemSetPreference::try_from(wire).unwrap();
        assert_eq!(
            pref,
            ProblemSetPreference::Topics(vec!["Array".into(), "Graphs".into()])
        );

        let back = PreferenceWire::from(&pref);
        assert_eq!(back.kind, "topics");
        assert!(back.sheet.is_none());
    }

    #[test]
    fn malformed_preference_wire_is_rejected() {
        let empty_topics = PreferenceWire {
            kind: "topics".into(),
            topics: Some(vec![]),
            sheet: None,
        };
        assert!(ProblemSetPreference::try_from(empty_topics).is_err());

        let missing_sheet = PreferenceWire {
            kind: "sheet".into(),
            topics: None,
            sheet: None,
        };
        assert!(ProblemSetPreference::try_from(missing_sheet).is_err());

        let unknown = PreferenceWire {
            kind: "random".into(),
            topics: None,
            sheet: None,
        };
        assert!(ProblemSetPreference::try_from(unknown).is_err());
    }
}
