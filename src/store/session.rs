use std::sync::Arc;

use tokio::sync::watch;

use crate::api::ProgressApi;
use crate::error::{Error, Result};
use crate::models::UserIdentity;

/// Whether a caller is authenticated, and as whom.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Anonymous,
    Authenticated(UserIdentity),
}

impl SessionStatus {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionStatus::Authenticated(_))
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Anonymous => write!(f, "anonymous"),
            SessionStatus::Authenticated(user) => write!(f, "authenticated as {}", user.email),
        }
    }
}

/// Holds the current session status and notifies dependents on change.
///
/// Starts anonymous and can cycle between states indefinitely. The only
/// mutation paths are `refresh`, the login helpers and `logout`.
pub struct SessionGate<A> {
    api: Arc<A>,
    status: watch::Sender<SessionStatus>,
}

impl<A: ProgressApi> SessionGate<A> {
    pub fn new(api: Arc<A>) -> Self {
        let (status, _) = watch::channel(SessionStatus::Anonymous);
        Self { api, status }
    }

    /// Last observed status, without touching the network.
    pub fn status(&self) -> SessionStatus {
        self.status.borrow().clone()
    }

    /// Receiver side of the gate; dependent caches watch this.
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    /// Re-resolves the identity against the backend. Absence of a live
    /// session is a normal outcome (anonymous), not an error; anything
    /// else fails with [`Error::Auth`] and leaves the status untouched.
    pub async fn refresh(&self) -> Result<SessionStatus> {
        let status = match self.api.current_user().await {
            Ok(Some(user)) => SessionStatus::Authenticated(user),
            Ok(None) => SessionStatus::Anonymous,
            Err(err) => {
                log::error!("[refresh] session check failed: {err}");
                return Err(Error::Auth(err.to_string()));
            }
        };

        self.publish(status.clone());
        Ok(status)
    }

    pub async fn login_google(&self, token: &str) -> Result<SessionStatus> {
        self.api.login_google(token).await?;
        self.refresh().await
    }

    pub async fn login_dev(&self, email: &str) -> Result<SessionStatus> {
        self.api.login_dev(email).await?;
        self.refresh().await
    }

    /// Ends the session. The local state goes anonymous even when the
    /// logout request itself fails; the server will expire the cookie on
    /// its own schedule.
    pub async fn logout(&self) {
        if let Err(err) = self.api.logout().await {
            log::error!("[logout] logout request failed: {err}");
        }
        self.publish(SessionStatus::Anonymous);
    }

    /// Publishes only real transitions, so dependents are not poked on
    /// every re-check of an unchanged session.
    fn publish(&self, status: SessionStatus) {
        self.status.send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status;
                true
            }
        });
    }
}
