use super::{ask_confirmation, session};
use crate::auth::AuthContext;
use crate::cli::parser::{Commands, UserAction};
use crate::config::Config;
use crate::core::user::UserLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::role::Role;
use crate::ui::messages::{info, success};
use crate::utils::table::{Column, Table};

fn parse_role(s: &str) -> AppResult<Role> {
    Role::from_code(s).ok_or_else(|| AppError::InvalidRole(s.to_string()))
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::User { action } = cmd {
        match action {
            UserAction::Add {
                name,
                email,
                personal_id,
                role,
            } => {
                let role = parse_role(role)?;
                let mut pool = DbPool::new(&cfg.database)?;

                // no acting user is fine while the database is still empty
                let ctx = match cfg.current_user.as_deref() {
                    Some(pid) => Some(AuthContext::resolve(&mut pool, Some(pid))?),
                    None => None,
                };

                let user = UserLogic::add(&mut pool, ctx.as_ref(), name, email, personal_id, role)?;
                success(format!(
                    "User {} ({}) created as {}",
                    user.name,
                    user.personal_id,
                    user.role.to_db_str()
                ));
            }

            UserAction::List { role } => {
                let role = role.as_deref().map(parse_role).transpose()?;
                let (mut pool, ctx) = session(cfg)?;
                let users = UserLogic::list(&mut pool, &ctx, role)?;

                if users.is_empty() {
                    info("No users found.");
                    return Ok(());
                }

                let mut table = Table::new(vec![
                    Column::new("ID", 4),
                    Column::new("PID", 10),
                    Column::new("NAME", 24),
                    Column::new("EMAIL", 28),
                    Column::new("ROLE", 8),
                ]);
                for u in &users {
                    table.add_row(vec![
                        u.id.to_string(),
                        u.personal_id.clone(),
                        u.name.clone(),
                        u.email.clone(),
                        u.role.to_db_str().to_string(),
                    ]);
                }
                print!("{}", table.render());
            }

            UserAction::Edit {
                personal_id,
                name,
                email,
            } => {
                if name.is_none() && email.is_none() {
                    info("Nothing to change: pass --name and/or --email.");
                    return Ok(());
                }
                let (mut pool, ctx) = session(cfg)?;
                let user =
                    UserLogic::update(&mut pool, &ctx, personal_id, name.as_deref(), email.as_deref())?;
                success(format!("{} updated: {} <{}>", user.personal_id, user.name, user.email));
            }

            UserAction::Role { personal_id, role } => {
                let role = parse_role(role)?;
                let (mut pool, ctx) = session(cfg)?;
                let user = UserLogic::set_role(&mut pool, &ctx, personal_id, role)?;
                success(format!("{} is now {}", user.personal_id, user.role.to_db_str()));
            }

            UserAction::Del { personal_id, yes } => {
                if !*yes
                    && !ask_confirmation(&format!(
                        "Delete user {} with all registrations and shifts?",
                        personal_id
                    ))
                {
                    info("Operation cancelled.");
                    return Ok(());
                }

                let (mut pool, ctx) = session(cfg)?;
                let user = UserLogic::delete(&mut pool, &ctx, personal_id)?;
                success(format!("User {} deleted.", user.personal_id));
            }
        }
    }

    Ok(())
}
