//! Sign-in, sign-out, profile refresh and password change

use shared::models::{ChangePasswordPayload, LoginRequest, SessionUser};
use shared::validation::validate_payload;

use super::Context;
use crate::cache::{Invalidate, QueryKey, Resource};
use crate::error::{ClientError, ClientResult};

pub struct AuthView {
    ctx: Context,
}

impl AuthView {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    /// Sign in and store the session. Cached data of any previous user is
    /// dropped.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<SessionUser> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        if let Err(failures) = validate_payload(&request) {
            return self.ctx.reject(ClientError::Validation(failures));
        }

        let login = self.ctx.api.auth.login(&request).await?;
        let user = login.user.clone();
        self.ctx.cache.clear().await;
        self.ctx.session.set_auth(login)?;
        tracing::info!(user_id = user.id, "signed in");
        Ok(user)
    }

    /// Revoke the token if possible, then always clear the session and the
    /// cache
    pub async fn logout(&self) -> ClientResult<()> {
        if self.ctx.session.is_authenticated() {
            if let Err(err) = self.ctx.api.auth.logout().await {
                tracing::warn!(error = %err, "server logout failed; clearing local session");
            }
        }
        self.ctx.cache.clear().await;
        self.ctx.session.logout()?;
        tracing::info!("signed out");
        Ok(())
    }

    /// Reload identity, role and permissions from the server
    pub async fn refresh_user(&self) -> ClientResult<SessionUser> {
        if !self.ctx.session.is_authenticated() {
            return self.ctx.reject(ClientError::NotAuthenticated);
        }
        let api = self.ctx.api.auth.clone();
        let current = self
            .ctx
            .cache
            .query(QueryKey::list(Resource::CurrentUser), move || async move {
                api.current_user().await
            })
            .await?;
        let user = current.user.clone();
        self.ctx.session.set_user(current)?;
        Ok(user)
    }

    pub async fn change_password(&self, payload: &ChangePasswordPayload) -> ClientResult<()> {
        if let Err(failures) = validate_payload(payload) {
            return self.ctx.reject(ClientError::Validation(failures));
        }
        self.ctx.api.auth.change_password(payload).await?;
        self.ctx
            .cache
            .invalidate(Invalidate::Resource(Resource::CurrentUser))
            .await;
        self.ctx.success("Updated", "Password changed.");
        Ok(())
    }
}
