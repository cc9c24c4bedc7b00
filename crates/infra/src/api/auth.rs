//! Session token and authentication operations
//!
//! The bearer token issued by login/refresh lives in a [`SessionToken`]
//! shared with the executor, which reads it on every attempt. It is never
//! persisted here; callers that want persistence read it back with
//! [`SessionToken::current`].

use std::fmt;

use careercraft_common::SecureString;
use careercraft_core::AccessTokenProvider;
use careercraft_domain::{
    AuthResponse, AuthStatus, LoginRequest, RefreshRequest, SessionInfo, StatusMessage,
};
use parking_lot::RwLock;
use tracing::{debug, info, instrument};

use super::client::ApiClient;
use super::errors::ApiError;
use crate::http::ApiRequest;

const LOGIN: &str = "/auth/login";
const REFRESH: &str = "/auth/refresh";
const LOGOUT: &str = "/auth/logout";
const STATUS: &str = "/auth/status";
const SESSION: &str = "/auth/session";

/// Current bearer token, replaced atomically.
#[derive(Default)]
pub struct SessionToken {
    token: RwLock<Option<SecureString>>,
}

impl SessionToken {
    pub fn set(&self, token: impl Into<String>) {
        *self.token.write() = Some(SecureString::new(token));
    }

    pub fn clear(&self) {
        *self.token.write() = None;
    }

    pub fn current(&self) -> Option<String> {
        self.token.read().as_ref().map(|token| token.expose().to_string())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }
}

impl AccessTokenProvider for SessionToken {
    fn bearer_token(&self) -> Option<String> {
        self.current()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken").field("authenticated", &self.is_authenticated()).finish()
    }
}

/// Clears the session when dropped, so an abandoned logout still ends it.
struct ClearOnDrop<'a>(&'a SessionToken);

impl Drop for ClearOnDrop<'_> {
    fn drop(&mut self) {
        self.0.clear();
    }
}

impl ApiClient {
    /// Exchange the API key for a session token and hold it.
    ///
    /// # Errors
    ///
    /// Returns the classified failure; the held token is left unchanged.
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let request = self.with_json(ApiRequest::post(LOGIN), request)?;
        let response: AuthResponse = self.call(request).await?;
        self.session().set(response.access_token.clone());
        info!(session_id = %response.session_id, expires_in = response.expires_in, "logged in");
        Ok(response)
    }

    /// Trade the held token for a fresh one.
    ///
    /// # Errors
    ///
    /// Rejected locally when no token is held.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<AuthResponse, ApiError> {
        let Some(current) = self.session().current() else {
            return Err(self.reject("no session token to refresh; log in first"));
        };
        let body = RefreshRequest { refresh_token: Some(current) };
        let request = self.with_json(ApiRequest::post(REFRESH), &body)?;
        let response: AuthResponse = self.call(request).await?;
        self.session().set(response.access_token.clone());
        debug!(session_id = %response.session_id, "session token refreshed");
        Ok(response)
    }

    /// End the session. The held token is cleared even when the call fails
    /// or the returned future is dropped before completing.
    ///
    /// # Errors
    ///
    /// Returns the classified failure of the logout call.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<StatusMessage, ApiError> {
        let clear = ClearOnDrop(self.session());
        let result = self.call(ApiRequest::post(LOGOUT)).await;
        drop(clear);
        info!(success = result.is_ok(), "logged out");
        result
    }

    #[instrument(skip(self))]
    pub async fn auth_status(&self) -> Result<AuthStatus, ApiError> {
        self.call(ApiRequest::get(STATUS)).await
    }

    #[instrument(skip(self))]
    pub async fn session_info(&self) -> Result<SessionInfo, ApiError> {
        self.call(ApiRequest::get(SESSION)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replace_and_clear() {
        let session = SessionToken::default();
        assert_eq!(session.bearer_token(), None);

        session.set("first");
        session.set("second");
        assert_eq!(session.bearer_token().as_deref(), Some("second"));

        session.clear();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn guard_clears_on_drop() {
        let session = SessionToken::default();
        session.set("token-1");
        {
            let _clear = ClearOnDrop(&session);
            assert!(session.is_authenticated());
        }
        assert!(!session.is_authenticated());
    }

    #[test]
    fn debug_does_not_leak_the_token() {
        let session = SessionToken::default();
        session.set("eyJhbGciOi");
        assert!(!format!("{session:?}").contains("eyJ"));
    }
}
