//! Account Service
//! Mission: Orchestrate registration, login and credential changes

use crate::auth::{
    hasher::{hash_password, verify_password, HashingError},
    models::User,
    token::{TokenAuthority, TokenIssueError},
    user_store::{StoreError, UserStore},
};
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("email is already registered")]
    EmailTaken,
    #[error(transparent)]
    Hashing(#[from] HashingError),
    #[error(transparent)]
    Token(#[from] TokenIssueError),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for RegistrationError {
    fn from(e: StoreError) -> Self {
        match e {
            // The store's UNIQUE constraint is the authoritative duplicate
            // guard; a conflicting insert that slipped past the pre-check
            // reports the same way the pre-check would have.
            StoreError::Conflict => RegistrationError::EmailTaken,
            other => RegistrationError::Store(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error(transparent)]
    Token(#[from] TokenIssueError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum PasswordChangeError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("new password must differ from the old one")]
    SamePassword,
    #[error(transparent)]
    Hashing(#[from] HashingError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Orchestrates account operations against the user store, the credential
/// hasher and the token authority. Holds no mutable state of its own.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<UserStore>,
    tokens: Arc<TokenAuthority>,
}

impl AccountService {
    pub fn new(store: Arc<UserStore>, tokens: Arc<TokenAuthority>) -> Self {
        Self { store, tokens }
    }

    /// Create a new account and sign the caller in.
    pub fn register(
        &self,
        email: &str,
        password: &str,
        nickname: &str,
    ) -> Result<(String, User), RegistrationError> {
        if self.store.find_by_email(email)?.is_some() {
            return Err(RegistrationError::EmailTaken);
        }

        let password_hash = hash_password(password)?;
        let now = Utc::now().to_rfc3339();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash,
            nickname: nickname.to_string(),
            avatar_url: String::new(),
            created_at: now.clone(),
            updated_at: now,
        };

        self.store.insert(&user)?;
        let token = self.tokens.issue(user.id)?;

        info!("✅ Registered account {} ({})", user.email, user.id);
        Ok((token, user))
    }

    /// Authenticate by email and password, minting a fresh token on success.
    pub fn login(&self, email: &str, password: &str) -> Result<(String, User), AuthError> {
        // Unknown email and wrong password take the same exit so responses
        // cannot be used to enumerate accounts.
        let Some(user) = self.store.find_by_email(email)? else {
            warn!("❌ Failed login attempt: {}", email);
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(&user.password_hash, password) {
            warn!("❌ Failed login attempt: {}", email);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id)?;

        info!("🔐 Login successful: {}", user.email);
        Ok((token, user))
    }

    /// Replace the account's credential after verifying the old password.
    pub fn change_password(
        &self,
        user_id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), PasswordChangeError> {
        let user = self
            .store
            .find_by_id(&user_id)?
            .ok_or(StoreError::NotFound)?;

        if !verify_password(&user.password_hash, old_password) {
            return Err(PasswordChangeError::InvalidCredentials);
        }

        // Plaintext comparison, before paying for another hash.
        if old_password == new_password {
            return Err(PasswordChangeError::SamePassword);
        }

        let new_hash = hash_password(new_password)?;
        self.store.update_credential(&user_id, &new_hash)?;

        info!("🔑 Password changed for {}", user.email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn test_service() -> (AccountService, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let store = Arc::new(UserStore::new(temp_file.path().to_str().unwrap()).unwrap());
        let tokens = Arc::new(TokenAuthority::new("service-test-secret".to_string(), 7));
        (AccountService::new(store, tokens), temp_file)
    }

    #[test]
    fn test_register_returns_valid_token_and_record() {
        let (service, _temp) = test_service();

        let (token, user) = service
            .register("alice@example.com", "secret1", "alice")
            .unwrap();

        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.nickname, "alice");

        let tokens = TokenAuthority::new("service-test-secret".to_string(), 7);
        assert_eq!(tokens.validate(&token), Ok(user.id));
    }

    #[test]
    fn test_register_duplicate_email_rejected() {
        let (service, _temp) = test_service();

        service
            .register("alice@example.com", "secret1", "alice")
            .unwrap();
        let err = service
            .register("alice@example.com", "other-pass", "impostor")
            .unwrap_err();
        assert!(matches!(err, RegistrationError::EmailTaken));
    }

    #[test]
    fn test_login_right_and_wrong_password() {
        let (service, _temp) = test_service();
        service
            .register("alice@example.com", "secret1", "alice")
            .unwrap();

        let err = service.login("alice@example.com", "wrongpass").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        let (token, user) = service.login("alice@example.com", "secret1").unwrap();
        assert!(!token.is_empty());
        assert_eq!(user.email, "alice@example.com");
    }

    #[test]
    fn test_login_unknown_email_indistinguishable() {
        let (service, _temp) = test_service();

        let err = service.login("nobody@example.com", "whatever").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn test_change_password_same_password_rejected() {
        let (service, _temp) = test_service();
        let (_, user) = service
            .register("bob@example.com", "original", "bob")
            .unwrap();

        let err = service
            .change_password(user.id, "original", "original")
            .unwrap_err();
        assert!(matches!(err, PasswordChangeError::SamePassword));
    }

    #[test]
    fn test_change_password_wrong_old_rejected() {
        let (service, _temp) = test_service();
        let (_, user) = service
            .register("bob@example.com", "original", "bob")
            .unwrap();

        let err = service
            .change_password(user.id, "not-the-password", "new-password")
            .unwrap_err();
        assert!(matches!(err, PasswordChangeError::InvalidCredentials));
    }

    #[test]
    fn test_change_password_replaces_credential() {
        let (service, _temp) = test_service();
        let (_, user) = service
            .register("bob@example.com", "original", "bob")
            .unwrap();

        service
            .change_password(user.id, "original", "replacement")
            .unwrap();

        // Old password no longer works, new one does.
        assert!(matches!(
            service.login("bob@example.com", "original").unwrap_err(),
            AuthError::InvalidCredentials
        ));
        assert!(service.login("bob@example.com", "replacement").is_ok());
    }

    #[test]
    fn test_change_password_unknown_user() {
        let (service, _temp) = test_service();

        let err = service
            .change_password(Uuid::new_v4(), "old", "new")
            .unwrap_err();
        assert!(matches!(
            err,
            PasswordChangeError::Store(StoreError::NotFound)
        ));
    }
}
