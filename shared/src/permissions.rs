//! Permission names and role checks
//!
//! Permission names match the backend route names (`roles.index`,
//! `roles.store`, ...). Users holding [`ADMIN_ROLE`] bypass every check.

/// Role that bypasses permission checks
pub const ADMIN_ROLE: &str = "super-admin";

pub const ROLE_LIST: &str = "roles.index";
pub const ROLE_CREATE: &str = "roles.store";
pub const ROLE_UPDATE: &str = "roles.update";
pub const ROLE_DELETE: &str = "roles.destroy";

/// Whether a user with `role` and `permissions` may use `name`
pub fn has_permission<S: AsRef<str>>(role: Option<&str>, permissions: &[S], name: &str) -> bool {
    if role == Some(ADMIN_ROLE) {
        return true;
    }
    permissions.iter().any(|p| p.as_ref() == name)
}
