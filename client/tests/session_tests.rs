//! Sign-in, persisted sessions, guarded routes and a library CRUD page

mod support;

use std::sync::Arc;

use shared::models::{LibraryKind, LibraryPayload, UserPayload};
use shared::permissions::ROLE_CREATE;

use ims_client::routes::{resolve, Page};
use ims_client::views::{
    AuthView, CrudAction, CrudView, LibraryResource, RequisitionDetailView, RoleResource,
    UserResource,
};
use ims_client::{ClientError, Context, MemoryNotifier, Session};
use support::{test_config, Harness, MockBackend, EMAIL, PASSWORD, TOKEN};

#[tokio::test]
async fn test_login_stores_session_and_unlocks_routes() {
    let h = Harness::signed_out().await;
    assert_eq!(
        resolve("/requisitions/pending", &h.ctx.session.snapshot()).page,
        Page::Login
    );

    let auth = AuthView::new(h.ctx.clone());
    let user = auth.login(EMAIL, PASSWORD).await.unwrap();
    assert_eq!(user.email, EMAIL);
    assert_eq!(h.ctx.session.token().as_deref(), Some(TOKEN));

    let state = h.ctx.session.snapshot();
    assert!(matches!(
        resolve("/requisitions/pending", &state).page,
        Page::Requisitions(_)
    ));
    assert_eq!(resolve("/settings/roles", &state).page, Page::Roles);
}

#[tokio::test]
async fn test_invalid_login_is_rejected_locally() {
    let h = Harness::signed_out().await;
    let auth = AuthView::new(h.ctx.clone());

    let err = auth.login("not-an-email", PASSWORD).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert!(auth.login(EMAIL, "").await.is_err());
    assert_eq!(h.backend.hits("POST", "auth/login"), 0);

    // Wrong password reaches the server
    assert!(auth.login(EMAIL, "wrong").await.is_err());
    assert_eq!(h.backend.hits("POST", "auth/login"), 1);
    assert!(!h.ctx.session.is_authenticated());
}

#[tokio::test]
async fn test_refresh_user_updates_permissions() {
    let h = Harness::signed_in().await;
    assert!(!h
        .ctx
        .session
        .snapshot()
        .permission
        .iter()
        .any(|p| p == ROLE_CREATE));

    let auth = AuthView::new(h.ctx.clone());
    auth.refresh_user().await.unwrap();
    assert!(h
        .ctx
        .session
        .snapshot()
        .permission
        .iter()
        .any(|p| p == ROLE_CREATE));

    // Cached until invalidated
    auth.refresh_user().await.unwrap();
    assert_eq!(h.backend.hits("GET", "auth/user"), 1);
}

#[tokio::test]
async fn test_logout_clears_even_when_server_fails() {
    let h = Harness::signed_in().await;
    let id = h.backend.seed_requisition("RIS-0200");
    RequisitionDetailView::new(h.ctx.clone(), id)
        .load()
        .await
        .unwrap();
    assert!(!h.ctx.cache.is_empty().await);

    h.backend
        .fail_all(axum::http::StatusCode::INTERNAL_SERVER_ERROR, "Down.");
    AuthView::new(h.ctx.clone()).logout().await.unwrap();

    assert_eq!(h.backend.hits("POST", "auth/logout"), 1);
    assert!(!h.ctx.session.is_authenticated());
    assert!(h.ctx.cache.is_empty().await);
}

#[tokio::test]
async fn test_persisted_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ims").join("auth.json");
    let backend = MockBackend::start().await;
    let config = test_config(&backend.host());

    let first = Arc::new(Session::persisted(path.clone()));
    first.hydrate().unwrap();
    let ctx = Context::new(&config, first, Arc::new(MemoryNotifier::new())).unwrap();
    AuthView::new(ctx).login(EMAIL, PASSWORD).await.unwrap();
    assert!(path.exists());

    // A new process picks up the token and can call protected endpoints
    let second = Arc::new(Session::persisted(path.clone()));
    second.hydrate().unwrap();
    assert_eq!(second.token().as_deref(), Some(TOKEN));
    let ctx = Context::new(&config, second, Arc::new(MemoryNotifier::new())).unwrap();
    let me = AuthView::new(ctx.clone()).refresh_user().await.unwrap();
    assert_eq!(me.email, EMAIL);

    AuthView::new(ctx).logout().await.unwrap();
    assert!(!path.exists());
}

#[tokio::test]
async fn test_library_page_crud() {
    let h = Harness::signed_in().await;
    let page = CrudView::new(
        h.ctx.clone(),
        LibraryResource::new(h.ctx.api.library(LibraryKind::Units)),
    );
    assert!(page.load().await.unwrap().data.is_empty());

    page.create(&LibraryPayload::new("Box")).await.unwrap();
    assert_eq!(h.last_toast().unwrap().message, "Unit created.");
    let rows = page.load().await.unwrap().data;
    assert_eq!(rows.len(), 1);
    assert_eq!(h.backend.hits("GET", "libraries/units"), 2);

    page.update(rows[0].id, &LibraryPayload::new("Carton"))
        .await
        .unwrap();
    assert_eq!(page.load().await.unwrap().data[0].name, "Carton");

    // Blank names never reach the server
    assert!(page.create(&LibraryPayload::new("  ")).await.is_err());
    assert_eq!(h.backend.hits("POST", "libraries/units"), 1);

    page.delete(rows[0].id).await.unwrap();
    assert_eq!(h.last_toast().unwrap().message, "Unit deleted.");
    assert!(page.load().await.unwrap().data.is_empty());

    // Other libraries are cached separately
    let brands = CrudView::new(
        h.ctx.clone(),
        LibraryResource::new(h.ctx.api.library(LibraryKind::Brands)),
    );
    assert!(brands.load().await.unwrap().data.is_empty());
    assert_eq!(h.backend.hits("GET", "libraries/brands"), 1);
}

#[tokio::test]
async fn test_role_mutations_need_permission() {
    let h = Harness::signed_out().await;
    let roles = CrudView::new(h.ctx.clone(), RoleResource::new(h.ctx.api.roles.clone()));
    assert!(!roles.can(CrudAction::Create));

    let err = roles.delete(3).await.unwrap_err();
    assert!(matches!(err, ClientError::Forbidden { .. }));
    assert_eq!(h.backend.total_hits(), 0);
    assert_eq!(h.last_toast().unwrap().title, "Forbidden");
}

fn user(password: Option<&str>) -> UserPayload {
    UserPayload {
        name: "Ana Reyes".into(),
        email: "ana@ims.test".into(),
        password: password.map(str::to_string),
        password_confirmation: password.map(str::to_string),
        role_id: Some(2),
    }
}

#[tokio::test]
async fn test_new_user_without_password_is_not_sent() {
    let h = Harness::signed_in().await;
    let page = CrudView::new(h.ctx.clone(), UserResource::new(h.ctx.api.users.clone()));

    let err = page.create(&user(None)).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    let err = page.create(&user(Some("   "))).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(h.backend.hits("POST", "users"), 0);
    let toast = h.last_toast().unwrap();
    assert_eq!(toast.title, "Validation");
    assert!(toast.message.contains("Password is required"));

    page.create(&user(Some("s3cure-pass"))).await.unwrap();
    assert_eq!(h.backend.hits("POST", "users"), 1);
    assert_eq!(h.last_toast().unwrap().message, "User created.");
    assert_eq!(h.backend.user_count(), 1);

    // Editing keeps the current password when none is given
    let id = page.load().await.unwrap().data[0].id;
    let mut renamed = user(None);
    renamed.name = "Ana R. Cruz".into();
    page.update(id, &renamed).await.unwrap();
    assert_eq!(h.backend.hits("PUT", &format!("users/{id}")), 1);
    assert_eq!(page.load().await.unwrap().data[0].name, "Ana R. Cruz");
}
