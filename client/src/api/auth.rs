use std::sync::Arc;

use serde::de::IgnoredAny;
use shared::models::{ChangePasswordPayload, CurrentUser, LoginRequest, LoginResponse};
use shared::types::SingleResponse;

use crate::error::ClientResult;
use crate::http::HttpClient;

/// `auth/*` endpoints
#[derive(Clone)]
pub struct AuthApi {
    http: Arc<HttpClient>,
}

impl AuthApi {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse> {
        let res: SingleResponse<LoginResponse> = self.http.post("auth/login", request).await?;
        Ok(res.data)
    }

    /// Revoke the current token on the server
    pub async fn logout(&self) -> ClientResult<()> {
        let _: IgnoredAny = self.http.post("auth/logout", &serde_json::json!({})).await?;
        Ok(())
    }

    pub async fn current_user(&self) -> ClientResult<CurrentUser> {
        let res: SingleResponse<CurrentUser> = self.http.get("auth/user").await?;
        Ok(res.data)
    }

    pub async fn change_password(&self, payload: &ChangePasswordPayload) -> ClientResult<()> {
        let _: IgnoredAny = self.http.put("auth/change-password", payload).await?;
        Ok(())
    }
}
