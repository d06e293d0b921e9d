//! Permission gate
//!
//! Maps a user role to the mutations it may perform. Evaluated per call.

use crate::models::{User, UserRole};

/// Mutations a role is allowed to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub can_move_issues: bool,
    pub can_resolve_issues: bool,
    pub can_edit_issues: bool,
    pub can_update_priority: bool,
}

impl Capabilities {
    /// Every capability granted
    pub const ALL: Capabilities = Capabilities {
        can_move_issues: true,
        can_resolve_issues: true,
        can_edit_issues: true,
        can_update_priority: true,
    };

    /// Every capability denied
    pub const NONE: Capabilities = Capabilities {
        can_move_issues: false,
        can_resolve_issues: false,
        can_edit_issues: false,
        can_update_priority: false,
    };
}

/// Capabilities granted to `role`.
pub fn capabilities(role: UserRole) -> Capabilities {
    match role {
        UserRole::Admin => Capabilities::ALL,
        UserRole::Contributor => Capabilities::NONE,
    }
}

/// Capabilities of the acting user.
pub fn capabilities_for(user: &User) -> Capabilities {
    capabilities(user.role)
}

pub fn can_move_issues(user: &User) -> bool {
    capabilities_for(user).can_move_issues
}

pub fn can_resolve_issues(user: &User) -> bool {
    capabilities_for(user).can_resolve_issues
}

pub fn can_edit_issues(user: &User) -> bool {
    capabilities_for(user).can_edit_issues
}

pub fn can_update_priority(user: &User) -> bool {
    capabilities_for(user).can_update_priority
}

/// Whether the board should render in read-only mode for this user
pub fn is_read_only(user: &User) -> bool {
    match user.role {
        UserRole::Admin => false,
        UserRole::Contributor => true,
    }
}
