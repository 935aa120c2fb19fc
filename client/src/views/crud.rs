//! Generic list/create/edit/delete page
//!
//! The eight library tables, products, purchase orders, users and roles all
//! follow the same page shape; each supplies a [`CrudResource`].

use std::future::Future;

use serde::Serialize;
use shared::models::{
    LibraryFilters, LibraryKind, LibraryPayload, LibraryRecord, Product, ProductFilters,
    ProductPayload, PurchaseOrder, PurchaseOrderFilters, PurchaseOrderPayload, Role, RolePayload,
    RoleWithPermissions, User, UserFilters, UserPayload,
};
use shared::permissions::{ROLE_CREATE, ROLE_DELETE, ROLE_UPDATE};
use shared::types::{ListResponse, PageParams};
use shared::validation::{validate_payload, ValidationFailure};
use validator::Validate;

use super::Context;
use crate::api::{LibraryApi, ListQuery, ProductsApi, PurchaseOrdersApi, RolesApi, UsersApi};
use crate::cache::{Invalidate, QueryKey, Resource};
use crate::error::{ClientError, ClientResult};

/// Mutations a page may gate behind a permission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrudAction {
    Create,
    Update,
    Delete,
}

/// A resource edited through [`CrudView`]
pub trait CrudResource: Send + Sync {
    type Record: Clone + Send + Sync + 'static;
    type Detail: Clone + Send + Sync + 'static;
    type Payload: Validate + Send + Sync;
    type Filters: Serialize + Clone + Default + Send + Sync;

    /// Singular name used in toasts
    fn label(&self) -> String;

    fn resource(&self) -> Resource;

    /// Permission needed for `action`, if any
    fn permission(&self, _action: CrudAction) -> Option<&'static str> {
        None
    }

    /// Checks run before a create is sent
    fn validate_create(&self, payload: &Self::Payload) -> Result<(), Vec<ValidationFailure>> {
        validate_payload(payload)
    }

    /// Checks run before an update is sent
    fn validate_update(&self, payload: &Self::Payload) -> Result<(), Vec<ValidationFailure>> {
        validate_payload(payload)
    }

    fn list(
        &self,
        filters: &Self::Filters,
        page: PageParams,
    ) -> impl Future<Output = ClientResult<ListResponse<Self::Record>>> + Send;

    fn get(&self, id: u64) -> impl Future<Output = ClientResult<Self::Detail>> + Send;

    fn create(&self, payload: &Self::Payload) -> impl Future<Output = ClientResult<()>> + Send;

    fn update(
        &self,
        id: u64,
        payload: &Self::Payload,
    ) -> impl Future<Output = ClientResult<()>> + Send;

    fn delete(&self, id: u64) -> impl Future<Output = ClientResult<()>> + Send;
}

/// List page with create/edit dialogs and row deletion
pub struct CrudView<R: CrudResource> {
    ctx: Context,
    resource: R,
    filters: R::Filters,
    page: PageParams,
}

impl<R: CrudResource> CrudView<R> {
    pub fn new(ctx: Context, resource: R) -> Self {
        Self {
            ctx,
            resource,
            filters: R::Filters::default(),
            page: PageParams::default(),
        }
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub fn filters(&self) -> &R::Filters {
        &self.filters
    }

    pub fn set_filters(&mut self, filters: R::Filters) {
        self.filters = filters;
        self.page.page = 1;
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = PageParams::new(page, self.page.page_size);
    }

    pub fn set_page_size(&mut self, page_size: u32) {
        self.page = PageParams::new(1, page_size);
    }

    /// Whether the signed-in user may perform `action`
    pub fn can(&self, action: CrudAction) -> bool {
        self.resource
            .permission(action)
            .map_or(true, |name| self.ctx.session.has_permission(name))
    }

    pub async fn load(&self) -> ClientResult<ListResponse<R::Record>> {
        let filters = self.filters.clone();
        let page = self.page;
        let key = QueryKey::list(self.resource.resource())
            .with_params(&ListQuery::new(&filters, page))?;
        self.ctx
            .cache
            .query(key, || self.resource.list(&filters, page))
            .await
    }

    pub async fn get(&self, id: u64) -> ClientResult<R::Detail> {
        let key = QueryKey::entity(self.resource.resource(), id);
        self.ctx
            .cache
            .query(key, || self.resource.get(id))
            .await
    }

    pub async fn create(&self, payload: &R::Payload) -> ClientResult<()> {
        self.guard(CrudAction::Create, self.resource.validate_create(payload))?;
        self.resource.create(payload).await?;
        self.finish("Created", "created").await;
        Ok(())
    }

    pub async fn update(&self, id: u64, payload: &R::Payload) -> ClientResult<()> {
        self.guard(CrudAction::Update, self.resource.validate_update(payload))?;
        self.resource.update(id, payload).await?;
        self.finish("Updated", "updated").await;
        Ok(())
    }

    pub async fn delete(&self, id: u64) -> ClientResult<()> {
        if !self.can(CrudAction::Delete) {
            return self.ctx.reject(forbidden());
        }
        self.resource.delete(id).await?;
        self.finish("Deleted", "deleted").await;
        Ok(())
    }

    fn guard(
        &self,
        action: CrudAction,
        checked: Result<(), Vec<ValidationFailure>>,
    ) -> ClientResult<()> {
        if !self.can(action) {
            return self.ctx.reject(forbidden());
        }
        match checked {
            Ok(()) => Ok(()),
            Err(failures) => self.ctx.reject(ClientError::Validation(failures)),
        }
    }

    async fn finish(&self, title: &str, verb: &str) {
        self.ctx
            .cache
            .invalidate(Invalidate::Resource(self.resource.resource()))
            .await;
        self.ctx
            .success(title, format!("{} {verb}.", self.resource.label()));
    }
}

fn forbidden() -> ClientError {
    ClientError::Forbidden {
        message: "You do not have permission to access this resource.".into(),
    }
}

// ============================================================================
// Resources
// ============================================================================

/// One of the eight library tables
#[derive(Clone)]
pub struct LibraryResource {
    api: LibraryApi,
}

impl LibraryResource {
    pub fn new(api: LibraryApi) -> Self {
        Self { api }
    }

    pub fn kind(&self) -> LibraryKind {
        self.api.kind()
    }
}

impl CrudResource for LibraryResource {
    type Record = LibraryRecord;
    type Detail = LibraryRecord;
    type Payload = LibraryPayload;
    type Filters = LibraryFilters;

    fn label(&self) -> String {
        self.api.kind().singular().to_string()
    }

    fn resource(&self) -> Resource {
        Resource::Library(self.api.kind())
    }

    async fn list(
        &self,
        filters: &LibraryFilters,
        page: PageParams,
    ) -> ClientResult<ListResponse<LibraryRecord>> {
        self.api.list(filters, page).await
    }

    async fn get(&self, id: u64) -> ClientResult<LibraryRecord> {
        self.api.get(id).await
    }

    async fn create(&self, payload: &LibraryPayload) -> ClientResult<()> {
        self.api.create(payload).await
    }

    async fn update(&self, id: u64, payload: &LibraryPayload) -> ClientResult<()> {
        self.api.update(id, payload).await
    }

    async fn delete(&self, id: u64) -> ClientResult<()> {
        self.api.delete(id).await
    }
}

#[derive(Clone)]
pub struct ProductResource {
    api: ProductsApi,
}

impl ProductResource {
    pub fn new(api: ProductsApi) -> Self {
        Self { api }
    }
}

impl CrudResource for ProductResource {
    type Record = Product;
    type Detail = Product;
    type Payload = ProductPayload;
    type Filters = ProductFilters;

    fn label(&self) -> String {
        "Product".into()
    }

    fn resource(&self) -> Resource {
        Resource::Products
    }

    async fn list(
        &self,
        filters: &ProductFilters,
        page: PageParams,
    ) -> ClientResult<ListResponse<Product>> {
        self.api.list(filters, page).await
    }

    async fn get(&self, id: u64) -> ClientResult<Product> {
        self.api.get(id).await
    }

    async fn create(&self, payload: &ProductPayload) -> ClientResult<()> {
        self.api.create(payload).await.map(|_| ())
    }

    async fn update(&self, id: u64, payload: &ProductPayload) -> ClientResult<()> {
        self.api.update(id, payload).await
    }

    async fn delete(&self, id: u64) -> ClientResult<()> {
        self.api.delete(id).await
    }
}

#[derive(Clone)]
pub struct PurchaseOrderResource {
    api: PurchaseOrdersApi,
}

impl PurchaseOrderResource {
    pub fn new(api: PurchaseOrdersApi) -> Self {
        Self { api }
    }
}

impl CrudResource for PurchaseOrderResource {
    type Record = PurchaseOrder;
    type Detail = PurchaseOrder;
    type Payload = PurchaseOrderPayload;
    type Filters = PurchaseOrderFilters;

    fn label(&self) -> String {
        "Purchase order".into()
    }

    fn resource(&self) -> Resource {
        Resource::PurchaseOrders
    }

    async fn list(
        &self,
        filters: &PurchaseOrderFilters,
        page: PageParams,
    ) -> ClientResult<ListResponse<PurchaseOrder>> {
        self.api.list(filters, page).await
    }

    async fn get(&self, id: u64) -> ClientResult<PurchaseOrder> {
        self.api.get(id).await
    }

    async fn create(&self, payload: &PurchaseOrderPayload) -> ClientResult<()> {
        self.api.create(payload).await.map(|_| ())
    }

    async fn update(&self, id: u64, payload: &PurchaseOrderPayload) -> ClientResult<()> {
        self.api.update(id, payload).await
    }

    async fn delete(&self, id: u64) -> ClientResult<()> {
        self.api.delete(id).await
    }
}

#[derive(Clone)]
pub struct UserResource {
    api: UsersApi,
}

impl UserResource {
    pub fn new(api: UsersApi) -> Self {
        Self { api }
    }
}

impl CrudResource for UserResource {
    type Record = User;
    type Detail = User;
    type Payload = UserPayload;
    type Filters = UserFilters;

    fn label(&self) -> String {
        "User".into()
    }

    fn resource(&self) -> Resource {
        Resource::Users
    }

    fn validate_create(&self, payload: &UserPayload) -> Result<(), Vec<ValidationFailure>> {
        payload.validate_for_create()
    }

    async fn list(&self, filters: &UserFilters, page: PageParams) -> ClientResult<ListResponse<User>> {
        self.api.list(filters, page).await
    }

    async fn get(&self, id: u64) -> ClientResult<User> {
        self.api.get(id).await
    }

    async fn create(&self, payload: &UserPayload) -> ClientResult<()> {
        self.api.create(payload).await.map(|_| ())
    }

    async fn update(&self, id: u64, payload: &UserPayload) -> ClientResult<()> {
        self.api.update(id, payload).await
    }

    async fn delete(&self, id: u64) -> ClientResult<()> {
        self.api.delete(id).await
    }
}

/// Roles; mutations need the matching `roles.*` permission
#[derive(Clone)]
pub struct RoleResource {
    api: RolesApi,
}

impl RoleResource {
    pub fn new(api: RolesApi) -> Self {
        Self { api }
    }

    pub async fn permissions(&self) -> ClientResult<Vec<String>> {
        self.api.permissions().await
    }
}

impl CrudResource for RoleResource {
    type Record = Role;
    type Detail = RoleWithPermissions;
    type Payload = RolePayload;
    type Filters = ();

    fn label(&self) -> String {
        "Role".into()
    }

    fn resource(&self) -> Resource {
        Resource::Roles
    }

    fn permission(&self, action: CrudAction) -> Option<&'static str> {
        Some(match action {
            CrudAction::Create => ROLE_CREATE,
            CrudAction::Update => ROLE_UPDATE,
            CrudAction::Delete => ROLE_DELETE,
        })
    }

    async fn list(&self, _filters: &(), page: PageParams) -> ClientResult<ListResponse<Role>> {
        self.api.list(page).await
    }

    async fn get(&self, id: u64) -> ClientResult<RoleWithPermissions> {
        self.api.get(id).await
    }

    async fn create(&self, payload: &RolePayload) -> ClientResult<()> {
        self.api.create(payload).await.map(|_| ())
    }

    async fn update(&self, id: u64, payload: &RolePayload) -> ClientResult<()> {
        self.api.update(id, payload).await
    }

    async fn delete(&self, id: u64) -> ClientResult<()> {
        self.api.delete(id).await
    }
}
