use crate::auth::{Action, AuthContext, Resource, can, ensure};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::users::{
    count_users, delete_user, email_taken, find_user_by_personal_id, insert_user, list_users,
    update_role, update_user,
};
use crate::errors::{AppError, AppResult};
use crate::models::role::Role;
use crate::models::user::User;
use crate::ui::messages::info;

pub struct UserLogic;

fn load(pool: &DbPool, personal_id: &str) -> AppResult<User> {
    find_user_by_personal_id(&pool.conn, personal_id)?
        .ok_or_else(|| AppError::UserNotFound(personal_id.to_string()))
}

fn check_email(email: &str) -> AppResult<()> {
    if !email.contains('@') {
        return Err(AppError::Other(format!("invalid e-mail address '{}'", email)));
    }
    Ok(())
}

impl UserLogic {
    /// Create a user. The very first user of an empty database is created
    /// as admin without an acting user; afterwards only admins may add users.
    pub fn add(
        pool: &mut DbPool,
        ctx: Option<&AuthContext>,
        name: &str,
        email: &str,
        personal_id: &str,
        role: Role,
    ) -> AppResult<User> {
        let name = name.trim();
        let email = email.trim();
        let personal_id = personal_id.trim();

        if name.is_empty() || personal_id.is_empty() {
            return Err(AppError::Other("name and personal id are required".into()));
        }
        check_email(email)?;

        let bootstrap = count_users(&pool.conn)? == 0;
        let role = if bootstrap {
            if role != Role::Admin {
                info("First user of this database: created as admin.");
            }
            Role::Admin
        } else {
            let ctx = ctx.ok_or(AppError::NotAuthenticated)?;
            ensure(ctx, Action::ManageUsers, Resource::Global)?;
            role
        };

        if find_user_by_personal_id(&pool.conn, personal_id)?.is_some() {
            return Err(AppError::Other(format!(
                "personal id '{}' is already taken",
                personal_id
            )));
        }

        let user = insert_user(&pool.conn, name, email, personal_id, role)?;

        ttlog(
            &pool.conn,
            ctx.map(|c| c.user_id),
            "user_add",
            &user.personal_id,
            &format!("User {} created with role {}", user.name, role.to_db_str()),
        )?;

        Ok(user)
    }

    pub fn list(pool: &mut DbPool, ctx: &AuthContext, role: Option<Role>) -> AppResult<Vec<User>> {
        ensure(ctx, Action::ViewTeam, Resource::Global)?;
        list_users(&pool.conn, role)
    }

    /// Change name and/or e-mail. Users edit their own profile; admins edit anyone.
    pub fn update(
        pool: &mut DbPool,
        ctx: &AuthContext,
        personal_id: &str,
        name: Option<&str>,
        email: Option<&str>,
    ) -> AppResult<User> {
        let mut user = load(pool, personal_id)?;
        if !can(ctx, Action::ManageUsers, Resource::Global) {
            ensure(ctx, Action::UpdateProfile, Resource::Owned(user.id))?;
        }

        if let Some(n) = name {
            let n = n.trim();
            if n.is_empty() {
                return Err(AppError::Other("name cannot be empty".into()));
            }
            user.name = n.to_string();
        }
        if let Some(e) = email {
            let e = e.trim();
            check_email(e)?;
            if email_taken(&pool.conn, e, user.id)? {
                return Err(AppError::Other(format!("e-mail '{}' is already in use", e)));
            }
            user.email = e.to_string();
        }

        update_user(&pool.conn, &user)?;

        ttlog(
            &pool.conn,
            Some(ctx.user_id),
            "user_edit",
            &user.personal_id,
            &format!("Profile updated: {} <{}>", user.name, user.email),
        )?;

        Ok(user)
    }

    pub fn set_role(
        pool: &mut DbPool,
        ctx: &AuthContext,
        personal_id: &str,
        role: Role,
    ) -> AppResult<User> {
        ensure(ctx, Action::ManageUsers, Resource::Global)?;
        let mut user = load(pool, personal_id)?;

        if user.id == ctx.user_id && role != Role::Admin {
            return Err(AppError::Forbidden("admins cannot demote themselves".into()));
        }

        update_role(&pool.conn, user.id, role)?;
        user.role = role;

        ttlog(
            &pool.conn,
            Some(ctx.user_id),
            "user_role",
            &user.personal_id,
            &format!("Role changed to {}", role.to_db_str()),
        )?;

        Ok(user)
    }

    /// Delete a user together with their registrations and schedules.
    pub fn delete(pool: &mut DbPool, ctx: &AuthContext, personal_id: &str) -> AppResult<User> {
        ensure(ctx, Action::ManageUsers, Resource::Global)?;
        let user = load(pool, personal_id)?;

        if user.id == ctx.user_id {
            return Err(AppError::Forbidden("you cannot delete yourself".into()));
        }

        delete_user(&pool.conn, user.id)?;

        ttlog(
            &pool.conn,
            Some(ctx.user_id),
            "user_del",
            &user.personal_id,
            &format!("User {} deleted", user.name),
        )?;

        Ok(user)
    }

    /// Personal id → numeric id, for `--user` style arguments.
    pub fn resolve_id(pool: &mut DbPool, personal_id: &str) -> AppResult<i64> {
        Ok(load(pool, personal_id)?.id)
    }
}
