use std::sync::Arc;

use serde::de::IgnoredAny;
use shared::models::{Role, RolePayload, RoleWithPermissions, User, UserFilters, UserPayload};
use shared::types::{ListResponse, PageParams, SingleResponse};

use super::ListQuery;
use crate::error::ClientResult;
use crate::http::HttpClient;

/// `users` endpoints
#[derive(Clone)]
pub struct UsersApi {
    http: Arc<HttpClient>,
}

impl UsersApi {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(&self, filters: &UserFilters, page: PageParams) -> ClientResult<ListResponse<User>> {
        self.http
            .get_with("users", &ListQuery::new(filters, page))
            .await
    }

    pub async fn get(&self, id: u64) -> ClientResult<User> {
        let res: SingleResponse<User> = self.http.get(&format!("users/{id}")).await?;
        Ok(res.data)
    }

    pub async fn create(&self, payload: &UserPayload) -> ClientResult<User> {
        let res: SingleResponse<User> = self.http.post("users", payload).await?;
        Ok(res.data)
    }

    pub async fn update(&self, id: u64, payload: &UserPayload) -> ClientResult<()> {
        let _: IgnoredAny = self.http.put(&format!("users/{id}"), payload).await?;
        Ok(())
    }

    pub async fn delete(&self, id: u64) -> ClientResult<()> {
        self.http.delete(&format!("users/{id}")).await
    }
}

/// `roles` endpoints
#[derive(Clone)]
pub struct RolesApi {
    http: Arc<HttpClient>,
}

impl RolesApi {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(&self, page: PageParams) -> ClientResult<ListResponse<Role>> {
        self.http.get_with("roles", &page).await
    }

    /// Every permission name the server knows
    pub async fn permissions(&self) -> ClientResult<Vec<String>> {
        let res: SingleResponse<Vec<String>> = self.http.get("roles/permissions").await?;
        Ok(res.data)
    }

    pub async fn get(&self, id: u64) -> ClientResult<RoleWithPermissions> {
        let res: SingleResponse<RoleWithPermissions> =
            self.http.get(&format!("roles/{id}")).await?;
        Ok(res.data)
    }

    pub async fn create(&self, payload: &RolePayload) -> ClientResult<Role> {
        let res: SingleResponse<Role> = self.http.post("roles", payload).await?;
        Ok(res.data)
    }

    pub async fn update(&self, id: u64, payload: &RolePayload) -> ClientResult<()> {
        let _: IgnoredAny = self.http.put(&format!("roles/{id}"), payload).await?;
        Ok(())
    }

    pub async fn delete(&self, id: u64) -> ClientResult<()> {
        self.http.delete(&format!("roles/{id}")).await
    }
}
