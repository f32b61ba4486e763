//! Proactive silent token renewal.
//!
//! One scheduler per session owns at most one live timer. Arming always
//! cancels any pending timer first, so repeated logins or callback replays
//! can never accumulate timers that double-fire a refresh.

use crate::config::ClientConfig;
use crate::error::SessionError;
use crate::store::SessionHandle;
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Renewal fires this long before the token's `exp`.
pub const SAFETY_MARGIN: Duration = Duration::from_secs(30);

/// Path of the credentialed refresh endpoint on the authority.
pub const REFRESH_PATH: &str = "/setrefreshtoken";

/// Obtains a fresh token from the identity provider using ambient
/// credentials (no user interaction).
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Request a new token.
    async fn refresh(&self) -> Result<String, SessionError>;
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    token: String,
}

/// HTTP refresher calling `GET <authority>/setrefreshtoken`.
///
/// The request is credentialed: the client keeps a cookie store so the
/// provider's ambient session cookie rides along.
#[derive(Debug, Clone)]
pub struct HttpTokenRefresher {
    client: reqwest::Client,
    refresh_url: url::Url,
}

impl HttpTokenRefresher {
    /// Create a refresher for the configured authority.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::RefreshRequest` if the HTTP client cannot be
    /// created, `SessionError::InvalidAuthority` if the refresh URL cannot
    /// be derived from the authority.
    pub fn new(config: &ClientConfig) -> Result<Self, SessionError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| SessionError::RefreshRequest(format!("Failed to create HTTP client: {e}")))?;

        let refresh_url = config
            .authority
            .join(REFRESH_PATH)
            .map_err(|e| SessionError::InvalidAuthority(e.to_string()))?;

        Ok(Self {
            client,
            refresh_url,
        })
    }
}

#[async_trait]
impl TokenRefresher for HttpTokenRefresher {
    async fn refresh(&self) -> Result<String, SessionError> {
        let response = self
            .client
            .get(self.refresh_url.clone())
            .send()
            .await
            .map_err(|e| SessionError::RefreshRequest(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SessionError::RefreshStatus(response.status().as_u16()));
        }

        let body: RefreshResponse = response
            .json()
            .await
            .map_err(|e| SessionError::MalformedRefreshResponse(e.to_string()))?;

        Ok(body.token)
    }
}

/// Compute how long to wait before renewing the given token.
///
/// `None` when the token carries no decodable `exp`. A token already within
/// the safety margin (or past expiry) yields a zero delay: renewal must
/// still be attempted immediately, never skipped.
#[must_use]
pub fn renewal_delay(token: &str) -> Option<Duration> {
    let exp = signon_auth::expiry(token)?;
    let remaining = exp - Utc::now().timestamp() - SAFETY_MARGIN.as_secs() as i64;
    Some(Duration::from_secs(remaining.max(0) as u64))
}

/// Owns the session's single refresh timer.
///
/// The timer handle is a first-class, cancellable value; `cancel` is
/// idempotent and always precedes arming a new timer.
#[derive(Clone)]
pub struct RefreshScheduler {
    session: SessionHandle,
    refresher: Arc<dyn TokenRefresher>,
    timer: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl std::fmt::Debug for RefreshScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshScheduler")
            .field("armed", &self.is_armed())
            .finish_non_exhaustive()
    }
}

impl RefreshScheduler {
    /// Create a scheduler for the given session.
    #[must_use]
    pub fn new(session: SessionHandle, refresher: Arc<dyn TokenRefresher>) -> Self {
        Self {
            session,
            refresher,
            timer: Arc::new(Mutex::new(None)),
        }
    }

    /// Arm the renewal timer for a token, cancelling any pending timer.
    ///
    /// On firing, the renewal procedure stores the new token in the session
    /// and re-arms itself, forming a self-sustaining loop until logout. A
    /// renewal failure stops the loop without touching the session: no
    /// retry, no session clear.
    pub fn schedule(&self, token: &str) {
        let Some(delay) = renewal_delay(token) else {
            tracing::warn!("token has no decodable exp claim; renewal not armed");
            return;
        };

        let session = self.session.clone();
        let refresher = Arc::clone(&self.refresher);

        // Cancel strictly before arming, under the slot lock: the previous
        // task must be dead before the replacement exists, so two timers can
        // never be live for the same session even with a zero delay.
        let mut timer = self.timer.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = timer.take() {
            previous.abort();
        }

        let task = tokio::spawn(async move {
            let mut delay = delay;
            loop {
                tokio::time::sleep(delay).await;
                match refresher.refresh().await {
                    Ok(token) => {
                        tracing::debug!("silent renewal obtained a fresh token");
                        session.set_token(Some(token.clone()));
                        match renewal_delay(&token) {
                            Some(next) => delay = next,
                            None => {
                                tracing::warn!(
                                    "renewed token has no decodable exp claim; renewal loop stopped"
                                );
                                break;
                            }
                        }
                    }
                    Err(err) => {
                        // Known gap, preserved: the session keeps its current
                        // token and no further renewal is attempted until the
                        // user logs in again.
                        tracing::warn!(error = %err, "silent renewal failed; renewal loop stopped");
                        break;
                    }
                }
            }
        });

        *timer = Some(task);
    }

    /// Cancel any pending timer. Safe to call at any time, any number of
    /// times; called on logout and before every new `schedule`.
    pub fn cancel(&self) {
        let mut timer = self.timer.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(task) = timer.take() {
            task.abort();
        }
    }

    /// Whether a renewal timer (or an in-flight renewal) is live.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        let timer = self.timer.lock().unwrap_or_else(|e| e.into_inner());
        timer.as_ref().is_some_and(|task| !task.is_finished())
    }
}
