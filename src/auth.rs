//! Sign in, sign up and sign out, keeping the session store in step with the server.

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::{ApiError, AuthApi};
use crate::domain::{LoginRequest, RegisterRequest, Session};
use crate::session::{SessionError, SessionStore};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl AuthError {
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AuthError::Api(e) => e.server_message().unwrap_or(fallback).to_string(),
            AuthError::Session(_) => fallback.to_string(),
        }
    }
}

pub struct AuthClient<A: AuthApi, S: SessionStore> {
    api: A,
    sessions: S,
}

impl<A: AuthApi, S: SessionStore> AuthClient<A, S> {
    pub fn new(api: A, sessions: S) -> Self {
        Self { api, sessions }
    }

    /// The session is only persisted once the server has accepted the credentials.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: LoginRequest) -> Result<Session, AuthError> {
        let session = self.api.login(request).await.map_err(|e| {
            warn!(error = %e, "Login failed");
            e
        })?;
        self.sessions.set(&session)?;
        info!(user_id = session.id, "Signed in");
        Ok(session)
    }

    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> Result<Session, AuthError> {
        let session = self.api.register(request).await.map_err(|e| {
            warn!(error = %e, "Registration failed");
            e
        })?;
        self.sessions.set(&session)?;
        info!(user_id = session.id, "Registered and signed in");
        Ok(session)
    }

    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<(), AuthError> {
        self.sessions.clear()?;
        info!("Signed out");
        Ok(())
    }

    pub fn current_user(&self) -> Result<Option<Session>, AuthError> {
        Ok(self.sessions.get()?)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.sessions.get(), Ok(Some(_)))
    }

    pub fn has_role(&self, role: &str) -> bool {
        matches!(self.sessions.get(), Ok(Some(session)) if session.has_role(role))
    }
}
