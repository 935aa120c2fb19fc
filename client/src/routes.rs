//! Application routes and guards
//!
//! Paths resolve to a [`Page`]. Index paths redirect to their default tab,
//! signed-out users are sent to `/login`, and pages behind a permission fall
//! back to `/settings/users`.

use shared::models::{DispenseTab, InspectionTab, LibraryKind, RequisitionTab};
use shared::permissions::{self, ROLE_LIST};

use crate::session::SessionState;

pub const LOGIN_PATH: &str = "/login";
pub const RESTRICTED_FALLBACK: &str = "/settings/users";

/// Redirects followed before giving up
const MAX_REDIRECTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Login,
    Dashboard,
    Products,
    ProductDetail(u64),
    Requisitions(RequisitionTab),
    RequisitionDetail(u64),
    PurchaseOrders,
    PurchaseOrderDetail(u64),
    Inspections(InspectionTab),
    InspectionDetail(u64),
    Dispenses(DispenseTab),
    DispenseDetail(u64),
    Reports,
    Users,
    Roles,
    SystemLogs,
    ChangePassword,
    MyProfile,
    Library(LibraryKind),
    NotFound,
}

impl Page {
    /// Canonical path of the page
    pub fn path(&self) -> String {
        match self {
            Page::Login => LOGIN_PATH.into(),
            Page::Dashboard => "/dashboard".into(),
            Page::Products => "/products".into(),
            Page::ProductDetail(id) => format!("/products/{id}"),
            Page::Requisitions(tab) => format!("/requisitions/{}", tab.slug()),
            Page::RequisitionDetail(id) => format!("/requisitions/{id}"),
            Page::PurchaseOrders => "/purchase-orders".into(),
            Page::PurchaseOrderDetail(id) => format!("/purchase-orders/{id}"),
            Page::Inspections(InspectionTab::All) => "/inspections".into(),
            Page::Inspections(InspectionTab::ToForward) => "/inspections/to-forward".into(),
            Page::Inspections(InspectionTab::Forwarded) => "/inspections/forwarded".into(),
            Page::InspectionDetail(id) => format!("/inspections/{id}"),
            Page::Dispenses(tab) => format!("/dispenses/{}", tab.slug()),
            Page::DispenseDetail(id) => format!("/dispenses/{id}"),
            Page::Reports => "/reports".into(),
            Page::Users => "/settings/users".into(),
            Page::Roles => "/settings/roles".into(),
            Page::SystemLogs => "/settings/logs".into(),
            Page::ChangePassword => "/change-password".into(),
            Page::MyProfile => "/my-profile".into(),
            Page::Library(kind) => format!("/{}", kind.path()),
            Page::NotFound => "/404".into(),
        }
    }

    /// Everything but the login and not-found pages sits behind the auth guard
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Page::Login | Page::NotFound)
    }

    pub fn required_permission(&self) -> Option<&'static str> {
        match self {
            Page::Roles => Some(ROLE_LIST),
            _ => None,
        }
    }
}

/// Outcome of matching a path, before guards
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Render(Page),
    Redirect(String),
}

/// Where navigation ends up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub page: Page,
    /// Final path after redirects
    pub location: String,
    pub redirected: bool,
}

/// Match a path against the route table
pub fn match_path(path: &str) -> Route {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let page = match segments.as_slice() {
        [] => return Route::Redirect("/dashboard".into()),
        ["login"] => Page::Login,
        ["dashboard"] => Page::Dashboard,
        ["products"] => Page::Products,
        ["products", id] => id_page(id, Page::ProductDetail),
        ["requisitions"] => return Route::Redirect("/requisitions/pending".into()),
        ["requisitions", slug] => match RequisitionTab::from_slug(slug) {
            Some(tab) => Page::Requisitions(tab),
            None => id_page(slug, Page::RequisitionDetail),
        },
        ["requisitions", id, "items" | "archive"] => id_page(id, Page::RequisitionDetail),
        ["purchase-orders"] => Page::PurchaseOrders,
        ["purchase-orders", id] => id_page(id, Page::PurchaseOrderDetail),
        ["inspections"] => Page::Inspections(InspectionTab::All),
        ["inspections", "to-forward"] => Page::Inspections(InspectionTab::ToForward),
        ["inspections", "forwarded"] => Page::Inspections(InspectionTab::Forwarded),
        ["inspections", id] => id_page(id, Page::InspectionDetail),
        ["dispenses"] => return Route::Redirect("/dispenses/for-dispense".into()),
        ["dispenses", slug] => match DispenseTab::from_slug(slug) {
            Some(tab) => Page::Dispenses(tab),
            None => id_page(slug, Page::DispenseDetail),
        },
        ["reports"] => Page::Reports,
        ["settings"] => return Route::Redirect(RESTRICTED_FALLBACK.into()),
        ["settings", "users"] => Page::Users,
        ["settings", "roles"] => Page::Roles,
        ["settings", "logs"] => Page::SystemLogs,
        ["change-password"] => Page::ChangePassword,
        ["my-profile"] => Page::MyProfile,
        ["libraries", slug] => LibraryKind::from_slug(slug)
            .map(Page::Library)
            .unwrap_or(Page::NotFound),
        _ => Page::NotFound,
    };
    Route::Render(page)
}

fn id_page(raw: &str, page: fn(u64) -> Page) -> Page {
    raw.parse().map(page).unwrap_or(Page::NotFound)
}

/// Signed-out users go to the login page
pub struct AuthGuard;

impl AuthGuard {
    pub fn check(page: &Page, session: &SessionState) -> Option<String> {
        (page.requires_auth() && !session.is_authenticated()).then(|| LOGIN_PATH.to_string())
    }
}

/// Pages behind a permission redirect elsewhere when it is missing
pub struct RestrictedRoute;

impl RestrictedRoute {
    pub fn check(page: &Page, session: &SessionState) -> Option<String> {
        let needed = page.required_permission()?;
        let allowed =
            permissions::has_permission(session.role.as_deref(), &session.permission, needed);
        (!allowed).then(|| RESTRICTED_FALLBACK.to_string())
    }
}

/// Resolve `path` for the given session, following redirects
pub fn resolve(path: &str, session: &SessionState) -> Resolved {
    let mut location = path.to_string();
    let mut redirected = false;
    for _ in 0..=MAX_REDIRECTS {
        let next = match match_path(&location) {
            Route::Redirect(to) => to,
            Route::Render(page) => {
                match AuthGuard::check(&page, session)
                    .or_else(|| RestrictedRoute::check(&page, session))
                {
                    Some(to) => to,
                    None => {
                        return Resolved {
                            page,
                            location: page.path(),
                            redirected,
                        }
                    }
                }
            }
        };
        tracing::debug!(from = %location, to = %next, "redirect");
        location = next;
        redirected = true;
    }
    tracing::warn!(path, "redirect loop");
    Resolved {
        page: Page::NotFound,
        location: Page::NotFound.path(),
        redirected,
    }
}
