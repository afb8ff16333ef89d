use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::{is_session_expiry, DifficultyUpdate, PreferenceWire, ProgressApi};
use crate::error::{Error, Result};
use crate::models::{
    Achievement, DailyQuestionSet, InventoryItem, Margins, ProblemSetPreference, UserIdentity,
    UserProgressSnapshot,
};

const API_KEY_HEADER: &str = "x-api-key";

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Backend connection settings, read from the environment in `main` and
/// passed through the call graph.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
}

type ExpiryHook = Arc<dyn Fn() + Send + Sync>;

/// Authenticated reqwest client for the backend.
///
/// Every request carries the API key header plus cookie-store session
/// credentials. 401s are classified here (see [`is_session_expiry`]):
/// the registered expiry hook fires once per detection and callers see
/// [`Error::SessionExpired`] instead of a plain transport error.
pub struct ApiClient {
    config: ApiConfig,
    http: reqwest::Client,
    at_entry_point: AtomicBool,
    expiry_hook: Mutex<Option<ExpiryHook>>,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let headers = HeaderMap::from_iter([(
            HeaderName::from_static(API_KEY_HEADER),
            HeaderValue::from_str(&config.api_key)
                .map_err(|_| Error::Validation("API key is not a valid header value".into()))?,
        )]);

        let http = reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            config,
            http,
            at_entry_point: AtomicBool::new(true),
            expiry_hook: Mutex::new(None),
        })
    }

    /// Registers the session-expiry effect (notice + redirect surrogate).
    /// Detection stays in [`is_session_expiry`] so it is testable without
    /// a navigation context.
    pub fn on_session_expired(&self, hook: impl Fn() + Send + Sync + 'static) {
        if let Ok(mut slot) = self.expiry_hook.lock() {
            *slot = Some(Arc::new(hook));
        }
    }

    /// Tells the client whether the app currently sits at the entry
    /// point, where a 401 is ordinary and must not redirect.
    pub fn set_at_entry_point(&self, at_entry_point: bool) {
        self.at_entry_point.store(at_entry_point, Ordering::Relaxed);
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Maps a raw response onto the error taxonomy, firing the expiry
    /// hook on a mid-session 401.
    fn classify(&self, path: &str, response: Response) -> Result<Response> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            if is_session_expiry(status.as_u16(), self.at_entry_point.load(Ordering::Relaxed)) {
                log::warn!("[classify] 401 on {path}, session expired");
                let hook = self
                    .expiry_hook
                    .lock()
                    .ok()
                    .and_then(|slot| slot.as_ref().cloned());
                if let Some(hook) = hook {
                    hook();
                }
            }
            return Err(Error::SessionExpired);
        }

        if !status.is_success() {
            return Err(Error::Transport(format!("HTTP {status} on {path}")));
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        log::trace!("[get_json] GET {path}");
        let response = self.http.get(self.url(path)).send().await?;
        Ok(self.classify(path, response)?.json::<T>().await?)
    }

    /// POST where only the status matters; the response body is dropped.
    async fn post_ack<B>(&self, path: &str, body: Option<&B>) -> Result<()>
    where
        B: Serialize + Sync + ?Sized,
    {
        log::trace!("[post_ack] POST {path}");
        let mut request = self.http.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        self.classify(path, response).map(|_| ())
    }
}

#[derive(Deserialize)]
struct DailyQuestionsResponse {
    problems: DailyQuestionSet,
}

#[derive(Deserialize)]
struct InventoryResponse {
    items: Vec<InventoryItem>,
}

#[derive(Deserialize)]
struct AchievementsResponse {
    achievements: Vec<Achievement>,
}

#[async_trait]
impl ProgressApi for ApiClient {
    async fn current_user(&self) -> Result<Option<UserIdentity>> {
        match self.get_json::<UserIdentity>("/auth/me").await {
            Ok(user) => Ok(Some(user)),
            Err(Error::SessionExpired) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn login_google(&self, token: &str) -> Result<()> {
        self.post_ack("/auth/google", Some(&serde_json::json!({ "token": token })))
            .await
    }

    async fn login_dev(&self, email: &str) -> Result<()> {
        self.post_ack("/auth/dev-login", Some(&serde_json::json!({ "email": email })))
            .await
    }

    async fn logout(&self) -> Result<()> {
        self.post_ack::<()>("/auth/logout", None).await
    }

    async fn fetch_stats(&self) -> Result<UserProgressSnapshot> {
        self.get_json("/user/stats").await
    }

    async fn fetch_daily_questions(&self) -> Result<DailyQuestionSet> {
        let response: DailyQuestionsResponse = self.get_json("/daily-questions").await?;
        Ok(response.problems)
    }

    async fn sync_progress(&self) -> Result<()> {
        self.post_ack::<()>("/user/sync", None).await
    }

    async fn update_difficulty(&self, update: &DifficultyUpdate) -> Result<()> {
        self.post_ack("/user/difficulty", Some(update)).await
    }

    async fn fetch_margins(&self) -> Result<Margins> {
        self.get_json("/user/margins").await
    }

    async fn fetch_inventory(&self) -> Result<Vec<InventoryItem>> {
        let response: InventoryResponse = self.get_json("/user/inventory").await?;
        Ok(response.items)
    }

    async fn fetch_achievements(&self) -> Result<Vec<Achievement>> {
        let response: AchievementsResponse = self.get_json("/user/achievements").await?;
        Ok(response.achievements)
    }

    async fn purchase_powerup(&self, powerup_id: &str) -> Result<()> {
        self.post_ack(
            "/user/purchase-powerup",
            Some(&serde_json::json!({ "powerup_id": powerup_id })),
        )
        .await
    }

    async fn fetch_preference(&self) -> Result<ProblemSetPreference> {
        let wire: PreferenceWire = self.get_json("/problems/preference").await?;
        wire.try_into()
    }

    async fn update_preference(&self, pref: &ProblemSetPreference) -> Result<()> {
        self.post_ack("/problems/preference", Some(&PreferenceWire::from(pref)))
            .await
    }
}
