// src/application/auth.rs
use crate::domain::{ConfirmationForm, DomainError, LoginForm, NewUser, Session, SignupForm};
use tracing::{debug, info, warn};

/// Hosted identity service.
#[allow(async_fn_in_trait)]
pub trait IdentityProvider {
    async fn sign_up(&mut self, email: &str, password: &str) -> Result<NewUser, DomainError>;

    async fn confirm_sign_up(&mut self, email: &str, code: &str) -> Result<(), DomainError>;

    /// Send a fresh confirmation code to a user who never confirmed.
    async fn resend_sign_up(&mut self, email: &str) -> Result<(), DomainError>;

    async fn sign_in(&mut self, email: &str, password: &str) -> Result<Session, DomainError>;

    async fn refresh(&mut self, session: &Session) -> Result<Session, DomainError>;

    async fn sign_out(&mut self, session: &Session) -> Result<(), DomainError>;
}

/// Persists the session between runs.
pub trait SessionStore {
    fn load(&self) -> Result<Option<Session>, DomainError>;
    fn save(&self, session: &Session) -> Result<(), DomainError>;
    fn clear(&self) -> Result<(), DomainError>;
}

/// Owns the current session and the authenticated flag every view reads.
pub struct Authenticator<P: IdentityProvider, S: SessionStore> {
    provider: P,
    store: S,
    session: Option<Session>,
}

impl<P: IdentityProvider, S: SessionStore> Authenticator<P, S> {
    pub fn new(provider: P, store: S) -> Self {
        Self {
            provider,
            store,
            session: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Restore the stored session, refreshing it when expired.
    ///
    /// Having no session is the normal signed-out state, not an error. A
    /// session the identity service refuses to refresh is discarded.
    pub async fn bootstrap(&mut self) -> Result<bool, DomainError> {
        let Some(stored) = self.store.load()? else {
            debug!("No current user");
            return Ok(false);
        };

        if !stored.is_expired() {
            self.session = Some(stored);
            return Ok(true);
        }

        match self.refresh_session(&stored).await {
            Ok(_) => Ok(true),
            Err(DomainError::AuthError(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Swap `stored` for a refreshed session.
    ///
    /// A refusal from the identity service signs the user out here and in
    /// the store. Any other failure leaves both untouched.
    async fn refresh_session(&mut self, stored: &Session) -> Result<&Session, DomainError> {
        match self.provider.refresh(stored).await {
            Ok(fresh) => {
                self.store.save(&fresh)?;
                debug!(username = %fresh.username, "Refreshed session");
                Ok(self.session.insert(fresh))
            }
            Err(DomainError::AuthError(reason)) => {
                warn!(%reason, "Stored session rejected, signing out");
                self.session = None;
                self.store.clear()?;
                Err(DomainError::AuthError(reason))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn login(&mut self, form: &mut LoginForm) -> Result<(), DomainError> {
        form.validate()?;
        form.loader.begin()?;
        let result = self.provider.sign_in(&form.email, &form.password).await;
        form.loader.finish();

        self.establish(result?)
    }

    /// Sign out remotely and forget the stored session.
    ///
    /// A failed remote sign-out does not keep the user signed in locally.
    pub async fn logout(&mut self) -> Result<(), DomainError> {
        if let Some(session) = self.session.take() {
            if let Err(e) = self.provider.sign_out(&session).await {
                warn!(error = %e, "Remote sign-out failed");
            }
            info!(username = %session.username, "Signed out");
        }
        self.store.clear()
    }

    /// Register a new user. The returned user must still be confirmed with
    /// the emailed code.
    ///
    /// When the email is already registered but was never confirmed, a new
    /// code is sent so the sign-up can be finished.
    pub async fn signup(&mut self, form: &mut SignupForm) -> Result<NewUser, DomainError> {
        form.validate()?;
        form.loader.begin()?;
        let result = self.register(&form.email, &form.password).await;
        form.loader.finish();
        result
    }

    async fn register(&mut self, email: &str, password: &str) -> Result<NewUser, DomainError> {
        match self.provider.sign_up(email, password).await {
            Ok(user) => {
                info!(username = %user.username, "Signed up");
                Ok(user)
            }
            Err(DomainError::UsernameExists(name)) => {
                debug!(%name, "User exists, resending confirmation code");
                match self.provider.resend_sign_up(email).await {
                    Ok(()) => Ok(NewUser {
                        username: email.to_string(),
                        user_sub: None,
                        confirmed: false,
                    }),
                    Err(_) => Err(DomainError::UsernameExists(name)),
                }
            }
            Err(e) => Err(e),
        }
    }

    pub async fn resend(&mut self, email: &str) -> Result<(), DomainError> {
        self.provider.resend_sign_up(email).await
    }

    /// Confirm a sign-up and sign the new user in.
    pub async fn confirm(
        &mut self,
        form: &mut ConfirmationForm,
        password: &str,
    ) -> Result<(), DomainError> {
        form.validate()?;
        form.loader.begin()?;
        let result = self.confirm_and_sign_in(&form.email, &form.code, password).await;
        form.loader.finish();

        self.establish(result?)
    }

    async fn confirm_and_sign_in(
        &mut self,
        email: &str,
        code: &str,
        password: &str,
    ) -> Result<Session, DomainError> {
        self.provider.confirm_sign_up(email, code).await?;
        self.provider.sign_in(email, password).await
    }

    /// Bearer token for API calls, refreshed when it has expired.
    pub async fn access_token(&mut self) -> Result<String, DomainError> {
        let session = self.session.clone().ok_or(DomainError::NoCurrentUser)?;
        if !session.is_expired() {
            return Ok(session.access_token);
        }
        let fresh = self.refresh_session(&session).await?;
        Ok(fresh.access_token.clone())
    }

    fn establish(&mut self, session: Session) -> Result<(), DomainError> {
        self.store.save(&session)?;
        info!(username = %session.username, "Signed in");
        self.session = Some(session);
        Ok(())
    }

    pub fn into_parts(self) -> (P, S) {
        (self.provider, self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::{sample_session, MemorySessionStore, MockIdentityProvider};
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn given_no_stored_session_when_bootstrapping_then_signed_out_without_error() {
        // Arrange
        let mut auth = Authenticator::new(MockIdentityProvider::new(), MemorySessionStore::empty());

        // Act
        let authenticated = auth.bootstrap().await.expect("missing session is not an error");

        // Assert
        assert!(!authenticated);
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn given_valid_stored_session_when_bootstrapping_then_signed_in() {
        let store = MemorySessionStore::with(sample_session(Utc::now() + Duration::hours(1)));
        let mut auth = Authenticator::new(MockIdentityProvider::new(), store);

        assert!(auth.bootstrap().await.expect("bootstrap succeeds"));
        assert!(auth.is_authenticated());
    }

    #[tokio::test]
    async fn given_expired_session_when_bootstrapping_then_refreshes_and_saves() {
        let store = MemorySessionStore::with(sample_session(Utc::now() - Duration::minutes(5)));
        let mut auth = Authenticator::new(MockIdentityProvider::new(), store);

        assert!(auth.bootstrap().await.expect("refresh succeeds"));

        let (provider, store) = auth.into_parts();
        assert_eq!(provider.calls(), ["refresh"]);
        let saved = store.current().expect("session saved");
        assert_eq!(saved.access_token, "refreshed-access");
    }

    #[tokio::test]
    async fn given_rejected_refresh_when_bootstrapping_then_clears_session() {
        let store = MemorySessionStore::with(sample_session(Utc::now() - Duration::minutes(5)));
        let provider = MockIdentityProvider::new().rejecting_refresh();
        let mut auth = Authenticator::new(provider, store);

        assert!(!auth.bootstrap().await.expect("rejection signs out"));

        let (_, store) = auth.into_parts();
        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn given_valid_credentials_when_logging_in_then_persists_session() {
        let mut auth = Authenticator::new(MockIdentityProvider::new(), MemorySessionStore::empty());
        let mut form = LoginForm::new("ada@example.com", "Passw0rd!");

        auth.login(&mut form).await.expect("login succeeds");

        assert!(auth.is_authenticated());
        assert!(!form.loader.is_loading());
        let (_, store) = auth.into_parts();
        assert_eq!(store.current().map(|s| s.username), Some("ada@example.com".to_string()));
    }

    #[tokio::test]
    async fn given_wrong_password_when_logging_in_then_stays_signed_out() {
        let provider = MockIdentityProvider::new().with_password("right");
        let mut auth = Authenticator::new(provider, MemorySessionStore::empty());
        let mut form = LoginForm::new("ada@example.com", "wrong");

        let result = auth.login(&mut form).await;

        assert!(matches!(result, Err(DomainError::AuthError(_))));
        assert!(!auth.is_authenticated());
        assert!(form.can_submit());
    }

    #[tokio::test]
    async fn given_failing_remote_sign_out_when_logging_out_then_still_clears_session() {
        let store = MemorySessionStore::with(sample_session(Utc::now() + Duration::hours(1)));
        let provider = MockIdentityProvider::new().failing_sign_out();
        let mut auth = Authenticator::new(provider, store);
        auth.bootstrap().await.expect("bootstrap succeeds");

        auth.logout().await.expect("logout succeeds locally");

        assert!(!auth.is_authenticated());
        let (_, store) = auth.into_parts();
        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn given_mismatched_passwords_when_signing_up_then_never_calls_service() {
        let mut auth = Authenticator::new(MockIdentityProvider::new(), MemorySessionStore::empty());
        let mut form = SignupForm::new("ada@example.com", "a", "b");

        let result = auth.signup(&mut form).await;

        assert!(matches!(result, Err(DomainError::InvalidForm(_))));
        let (provider, _) = auth.into_parts();
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn given_unconfirmed_existing_user_when_signing_up_then_resends_code() {
        let provider = MockIdentityProvider::new().with_existing_user("ada@example.com");
        let mut auth = Authenticator::new(provider, MemorySessionStore::empty());
        let mut form = SignupForm::new("ada@example.com", "pw", "pw");

        let user = auth.signup(&mut form).await.expect("resend recovers sign-up");

        assert!(!user.confirmed);
        let (provider, _) = auth.into_parts();
        assert_eq!(provider.calls(), ["sign_up", "resend_sign_up"]);
    }

    #[tokio::test]
    async fn given_confirmation_code_when_confirming_then_signs_in() {
        let mut auth = Authenticator::new(MockIdentityProvider::new(), MemorySessionStore::empty());
        let mut form = ConfirmationForm::new("ada@example.com", "123456");

        auth.confirm(&mut form, "Passw0rd!").await.expect("confirm succeeds");

        assert!(auth.is_authenticated());
        let (provider, _) = auth.into_parts();
        assert_eq!(provider.calls(), ["confirm_sign_up", "sign_in"]);
    }

    #[tokio::test]
    async fn given_signed_out_user_when_requesting_token_then_no_current_user() {
        let mut auth = Authenticator::new(MockIdentityProvider::new(), MemorySessionStore::empty());

        let result = auth.access_token().await;

        assert!(matches!(result, Err(DomainError::NoCurrentUser)));
    }

    #[tokio::test]
    async fn given_expired_session_when_requesting_token_then_refreshes_and_saves() {
        let expired = sample_session(Utc::now() - Duration::minutes(5));
        let mut auth = Authenticator::new(MockIdentityProvider::new(), MemorySessionStore::with(expired.clone()));
        auth.session = Some(expired);

        let token = auth.access_token().await.expect("refresh succeeds");

        assert_eq!(token, "refreshed-access");
        let (_, store) = auth.into_parts();
        assert_eq!(store.current().map(|s| s.access_token), Some(token));
    }

    #[tokio::test]
    async fn given_rejected_refresh_when_requesting_token_then_signs_out() {
        let expired = sample_session(Utc::now() - Duration::minutes(5));
        let provider = MockIdentityProvider::new().rejecting_refresh();
        let mut auth = Authenticator::new(provider, MemorySessionStore::with(expired.clone()));
        auth.session = Some(expired);

        let result = auth.access_token().await;

        assert!(matches!(result, Err(DomainError::AuthError(_))));
        assert!(!auth.is_authenticated());
        let (_, store) = auth.into_parts();
        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn given_unreachable_identity_service_when_requesting_token_then_keeps_session() {
        let expired = sample_session(Utc::now() - Duration::minutes(5));
        let provider = MockIdentityProvider::new().unreachable_refresh();
        let mut auth = Authenticator::new(provider, MemorySessionStore::with(expired.clone()));
        auth.session = Some(expired);

        let result = auth.access_token().await;

        assert!(matches!(result, Err(DomainError::Unreachable(_))));
        assert!(auth.is_authenticated());
        let (_, store) = auth.into_parts();
        assert!(store.current().is_some());
    }

    #[tokio::test]
    async fn given_unreachable_identity_service_when_bootstrapping_then_keeps_stored_session() {
        let store = MemorySessionStore::with(sample_session(Utc::now() - Duration::minutes(5)));
        let provider = MockIdentityProvider::new().unreachable_refresh();
        let mut auth = Authenticator::new(provider, store);

        let result = auth.bootstrap().await;

        assert!(matches!(result, Err(DomainError::Unreachable(_))));
        let (_, store) = auth.into_parts();
        assert!(store.current().is_some());
    }
}
