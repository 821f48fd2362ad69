//! Explicit authorization: who is acting, and what they may do.
//!
//! Handlers never look up "the current user" on their own. The CLI builds one
//! `AuthContext` per invocation and hands it to the core logic, which asks
//! `can()` before touching anything.

use crate::db::pool::DbPool;
use crate::db::queries::users::find_user_by_personal_id;
use crate::errors::{AppError, AppResult};
use crate::models::role::Role;
use crate::models::user::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: i64,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewRegistration,
    CreateRegistration,
    UpdateRegistration,
    ReviewRegistration,
    DeleteRegistration,
    ClockIn,
    ViewTeam,
    UpdateProfile,
    ManageUsers,
    ManageOvertime,
    ManageLocations,
    DeleteLocation,
    ViewSchedule,
    ManageSchedules,
}

/// What the action targets: something owned by a user, or shared data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Owned(i64),
    Global,
}

impl AuthContext {
    pub fn new(user_id: i64, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn for_user(user: &User) -> Self {
        Self::new(user.id, user.role)
    }

    /// Resolve the acting user from a personal id (`--as` or `current_user`).
    pub fn resolve(pool: &mut DbPool, personal_id: Option<&str>) -> AppResult<Self> {
        let pid = personal_id.ok_or(AppError::NotAuthenticated)?;
        let user = find_user_by_personal_id(&pool.conn, pid)?
            .ok_or_else(|| AppError::UserNotFound(pid.to_string()))?;
        Ok(Self::for_user(&user))
    }

    fn owns(&self, resource: Resource) -> bool {
        matches!(resource, Resource::Owned(owner) if owner == self.user_id)
    }
}

/// Pure permission check.
pub fn can(ctx: &AuthContext, action: Action, resource: Resource) -> bool {
    match ctx.role {
        Role::Admin => true,
        Role::Manager => match action {
            Action::ManageUsers | Action::ManageOvertime | Action::DeleteLocation => false,
            Action::UpdateProfile => ctx.owns(resource),
            _ => true,
        },
        Role::Employee => match action {
            Action::ViewRegistration
            | Action::CreateRegistration
            | Action::UpdateRegistration
            | Action::ClockIn
            | Action::ViewSchedule
            | Action::UpdateProfile => ctx.owns(resource),
            _ => false,
        },
    }
}

/// `can()` turned into an error for `?` propagation.
pub fn ensure(ctx: &AuthContext, action: Action, resource: Resource) -> AppResult<()> {
    if can(ctx, action, resource) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!("{:?} is not allowed", action)))
    }
}
