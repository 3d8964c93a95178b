//! Account lifecycle: signup, login, token checks, settings and profile.

use crate::auth::{hash_password, verify_password};
use crate::{Result, SqlChatError, Store, TokenSigner};
use sqlchat_types::{
    AuthResponse, Identity, LoginRequest, ProfileUpdate, SettingsUpdate, SignupRequest, User,
    UserProfile, UserSettings, UserSummary,
};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct Accounts {
    store: Arc<Store>,
    signer: Arc<TokenSigner>,
}

impl Accounts {
    pub fn new(store: Arc<Store>, signer: Arc<TokenSigner>) -> Self {
        Self { store, signer }
    }

    /// Register a user and sign them in.
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse> {
        let name = request.name.trim();
        let email = request.email.trim();
        if name.is_empty() || email.is_empty() || request.password.is_empty() {
            return Err(SqlChatError::missing_fields());
        }
        if self.store.find_user_by_email(email)?.is_some() {
            return Err(SqlChatError::UserExists);
        }

        let password = request.password.clone();
        let digest = off_worker(move || hash_password(&password)).await?;
        let user = self.store.create_user(name, email, &digest)?;
        info!(target: "sqlchat::auth", "Registered user {}", user.id);

        self.respond("User created successfully", &user)
    }

    /// Verify credentials and issue a fresh token.
    ///
    /// Unknown e-mail and wrong password produce the same error. The
    /// deactivation notice is only given once the password matched.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        let email = request.email.trim();
        if email.is_empty() || request.password.is_empty() {
            return Err(SqlChatError::missing_fields());
        }

        let user = self
            .store
            .find_user_by_email(email)?
            .ok_or(SqlChatError::InvalidCredentials)?;

        let password = request.password.clone();
        let phc = user.password_hash.clone();
        if !off_worker(move || Ok(verify_password(&password, &phc))).await? {
            debug!(target: "sqlchat::auth", "Password mismatch for user {}", user.id);
            return Err(SqlChatError::InvalidCredentials);
        }
        if !user.is_active {
            warn!(target: "sqlchat::auth", "Login refused for deactivated user {}", user.id);
            return Err(SqlChatError::AccountDeactivated);
        }

        self.store.touch_last_login(user.id)?;
        info!(target: "sqlchat::auth", "User {} logged in", user.id);
        self.respond("Login successful", &user)
    }

    /// Verify a bearer token.
    pub fn authenticate(&self, token: &str) -> Result<Identity> {
        self.signer.verify(token)
    }

    pub fn settings(&self, user_id: Uuid) -> Result<UserSettings> {
        self.store.get_settings(user_id)
    }

    /// Merge a partial update into the stored settings.
    pub fn update_settings(&self, user_id: Uuid, update: &SettingsUpdate) -> Result<UserSettings> {
        let merged = self
            .store
            .get_settings(user_id)?
            .merged(update)
            .map_err(SqlChatError::Validation)?;
        self.store.put_settings(user_id, &merged)?;
        Ok(merged)
    }

    pub fn profile(&self, user_id: Uuid) -> Result<UserProfile> {
        self.store
            .get_profile(user_id)?
            .ok_or(SqlChatError::NotFound("User"))
    }

    pub fn update_profile(&self, user_id: Uuid, update: &ProfileUpdate) -> Result<UserProfile> {
        self.store.update_profile(user_id, update)
    }

    fn respond(&self, message: &str, user: &User) -> Result<AuthResponse> {
        let token = self.signer.issue(Identity {
            user_id: user.id,
            role: user.role,
        })?;
        Ok(AuthResponse {
            message: message.to_string(),
            token,
            user: UserSummary::from(user),
        })
    }
}

/// Argon2 is CPU-bound; keep it off the async worker threads.
async fn off_worker<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| SqlChatError::PasswordHash(e.to_string()))?
}
