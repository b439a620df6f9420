//! Session context: who is signed in and whether they are an admin.
//!
//! An [`IdentityProvider`] publishes sign-in/sign-out notifications on a
//! watch channel. [`SessionManager`] resolves each notification against the
//! `admins` collection and publishes the resulting [`SessionContext`].

use crate::service::FaqService;
use crate::types::AdminRecord;
use helpdesk_core::{AppError, AppResult};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// An authenticated user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub uid: String,
    pub email: Option<String>,
}

impl UserIdentity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
        }
    }
}

/// Authentication state notified by an identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    SignedOut,
    SignedIn(UserIdentity),
}

/// Snapshot of the current session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionContext {
    pub user: Option<UserIdentity>,

    /// Admin record of the signed-in user, if they are an admin
    pub admin: Option<AdminRecord>,

    /// True until the first notification has been resolved
    pub loading: bool,
}

impl SessionContext {
    pub fn is_admin(&self) -> bool {
        self.user.is_some() && self.admin.is_some()
    }
}

/// Fail with `AppError::Auth` unless the session belongs to an admin.
pub fn require_admin(context: &SessionContext) -> AppResult<&AdminRecord> {
    if context.loading {
        return Err(AppError::Auth("Session is still loading".to_string()));
    }

    match (&context.user, &context.admin) {
        (Some(_), Some(admin)) => Ok(admin),
        (Some(user), None) => Err(AppError::Auth(format!(
            "User '{}' is not an admin",
            user.uid
        ))),
        (None, _) => Err(AppError::Auth(
            "Sign in as an admin to manage the helpdesk (use --user)".to_string(),
        )),
    }
}

/// Source of authentication state.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Receiver that yields the current state and every later change.
    fn subscribe(&self) -> watch::Receiver<AuthState>;

    async fn sign_out(&self) -> AppResult<()>;
}

/// In-process identity provider; sign-in is whatever the caller asserts.
#[derive(Debug)]
pub struct LocalIdentityProvider {
    state: watch::Sender<AuthState>,
}

impl LocalIdentityProvider {
    pub fn new() -> Self {
        let (state, _) = watch::channel(AuthState::SignedOut);
        Self { state }
    }

    pub fn sign_in(&self, user: UserIdentity) {
        tracing::debug!("Signed in as {}", user.uid);
        self.state.send_replace(AuthState::SignedIn(user));
    }
}

impl Default for LocalIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IdentityProvider for LocalIdentityProvider {
    fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    async fn sign_out(&self) -> AppResult<()> {
        self.state.send_replace(AuthState::SignedOut);
        Ok(())
    }
}

/// Keeps a [`SessionContext`] in step with an identity provider.
pub struct SessionManager {
    service: FaqService,
    provider: Arc<dyn IdentityProvider>,
    context: watch::Sender<SessionContext>,
}

impl SessionManager {
    pub fn new(service: FaqService, provider: Arc<dyn IdentityProvider>) -> Self {
        let (context, _) = watch::channel(SessionContext {
            loading: true,
            ..Default::default()
        });

        Self {
            service,
            provider,
            context,
        }
    }

    /// Current session snapshot.
    pub fn context(&self) -> SessionContext {
        self.context.borrow().clone()
    }

    /// Receiver notified on every published context.
    pub fn watch(&self) -> watch::Receiver<SessionContext> {
        self.context.subscribe()
    }

    /// Resolve an auth state into a context and publish it.
    ///
    /// A failed admin lookup is logged and leaves the user without admin rights.
    pub async fn refresh(&self, state: &AuthState) -> SessionContext {
        let context = match state {
            AuthState::SignedOut => SessionContext::default(),
            AuthState::SignedIn(user) => {
                let admin = match self.service.find_admin(&user.uid).await {
                    Ok(admin) => admin,
                    Err(e) => {
                        tracing::error!("Error checking admin status: {}", e);
                        None
                    }
                };

                SessionContext {
                    user: Some(user.clone()),
                    admin,
                    loading: false,
                }
            }
        };

        tracing::debug!(
            "Session refreshed (user: {:?}, admin: {})",
            context.user.as_ref().map(|u| u.uid.as_str()),
            context.is_admin()
        );

        self.context.send_replace(context.clone());
        context
    }

    /// Resolve the provider's current state once.
    pub async fn sync(&self) -> SessionContext {
        let state = self.provider.subscribe().borrow().clone();
        self.refresh(&state).await
    }

    /// Follow provider notifications until the provider goes away.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        let mut notifications = self.provider.subscribe();

        tokio::spawn(async move {
            loop {
                let state = notifications.borrow_and_update().clone();
                self.refresh(&state).await;

                if notifications.changed().await.is_err() {
                    tracing::debug!("Identity provider closed, session watcher stopping");
                    break;
                }
            }
        })
    }

    /// Sign out through the provider and clear the session.
    pub async fn logout(&self) -> AppResult<()> {
        self.provider.sign_out().await?;
        self.refresh(&AuthState::SignedOut).await;
        Ok(())
    }
}
