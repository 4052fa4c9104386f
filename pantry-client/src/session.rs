//! Who may open the admin view.
//!
//! Authorization here is cosmetic: a token in local storage is the whole story.
//! It is never checked by the sheet and never expires on its own.
use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};

use crate::local::KeyValueStore;

/// Key holding the opaque session token.
pub const TOKEN_KEY: &str = "session_token";

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin";

const LOGIN_FAILED: &str = "Invalid username or password";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Success { token: String },
    Failure { message: String },
}

impl LoginOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LoginOutcome::Success { .. })
    }
}

/// The entry points of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Listing,
    Detail(i64),
    Login,
    Admin,
}

impl Route {
    pub fn requires_admin(&self) -> bool {
        matches!(self, Route::Admin)
    }
}

#[derive(Clone)]
pub struct Session {
    store: Arc<dyn KeyValueStore>,
    login_delay: Duration,
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            login_delay: Duration::from_millis(600),
        }
    }

    pub fn with_login_delay(mut self, login_delay: Duration) -> Self {
        self.login_delay = login_delay;
        self
    }

    /// Compare against the fixed admin credentials, after a pause that mimics a round trip.
    pub async fn login(&self, username: &str, password: &str) -> LoginOutcome {
        tokio::time::sleep(self.login_delay).await;
        if username != ADMIN_USERNAME || password != ADMIN_PASSWORD {
            tracing::info!("Rejected login for {username:?}");
            return LoginOutcome::Failure {
                message: LOGIN_FAILED.into(),
            };
        }
        let token = new_token();
        if let Err(err) = self.store.set(TOKEN_KEY, &token) {
            tracing::error!("Could not save the session token: {err}");
            return LoginOutcome::Failure {
                message: format!("Could not save the session: {err}"),
            };
        }
        tracing::info!("Logged in as {username}");
        LoginOutcome::Success { token }
    }

    pub fn logout(&self) {
        if let Err(err) = self.store.remove(TOKEN_KEY) {
            tracing::error!("Could not clear the session token: {err}");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.get(TOKEN_KEY).is_some()
    }

    /// Send unauthenticated visitors of admin-only routes to the login entry point instead.
    pub fn guard(&self, route: Route) -> Route {
        if route.requires_admin() && !self.is_authenticated() {
            tracing::debug!("Redirecting {route:?} to login");
            Route::Login
        } else {
            route
        }
    }
}

/// An opaque token derived from the current time. It proves nothing.
fn new_token() -> String {
    let now = chrono::Utc::now().timestamp_micros();
    hex::encode(Sha256::digest(now.to_le_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::MemoryStore;

    fn session() -> (Arc<MemoryStore>, Session) {
        let store = Arc::new(MemoryStore::default());
        let session = Session::new(store.clone()).with_login_delay(Duration::ZERO);
        (store, session)
    }

    #[tokio::test]
    async fn correct_credentials_persist_a_token() {
        let (store, session) = session();
        let outcome = session.login("admin", "admin").await;
        let LoginOutcome::Success { token } = outcome else {
            panic!("expected success, got {outcome:?}");
        };
        assert_eq!(token.len(), 64);
        assert_eq!(store.get(TOKEN_KEY), Some(token));
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn wrong_password_persists_nothing() {
        let (store, session) = session();
        let outcome = session.login("admin", "wrong").await;
        let LoginOutcome::Failure { message } = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert!(!message.is_empty());
        assert_eq!(store.get(TOKEN_KEY), None);
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn credentials_are_compared_literally() {
        let (_, session) = session();
        assert!(!session.login("Admin", "admin").await.is_success());
        assert!(!session.login("admin ", "admin").await.is_success());
        assert!(!session.login("", "").await.is_success());
    }

    #[tokio::test]
    async fn logout_clears_the_token() {
        let (_, session) = session();
        session.login("admin", "admin").await;
        session.logout();
        assert!(!session.is_authenticated());
        // Logging out twice is fine
        session.logout();
    }

    #[tokio::test]
    async fn guard_redirects_admin_until_logged_in() {
        let (_, session) = session();
        assert_eq!(session.guard(Route::Admin), Route::Login);
        assert_eq!(session.guard(Route::Listing), Route::Listing);
        assert_eq!(session.guard(Route::Detail(3)), Route::Detail(3));

        session.login("admin", "admin").await;
        assert_eq!(session.guard(Route::Admin), Route::Admin);
    }

    #[tokio::test(start_paused = true)]
    async fn login_waits_for_the_configured_delay() {
        let store = Arc::new(MemoryStore::default());
        let session = Session::new(store).with_login_delay(Duration::from_secs(2));
        let started = tokio::time::Instant::now();
        session.login("admin", "admin").await;
        assert!(started.elapsed() >= Duration::from_secs(2));
    }
}
