use crate::auth::{Action, AuthContext, Resource, ensure};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::overtime::{
    delete_overtime_rule, get_overtime_rule, insert_overtime_rule, list_overtime_rules,
    update_overtime_rule,
};
use crate::errors::{AppError, AppResult};
use crate::models::overtime::{OvertimeRule, OvertimeType};

/// Input of `add`.
#[derive(Debug, Clone)]
pub struct NewOvertimeRule {
    pub name: String,
    pub kind: OvertimeType,
    pub multiplier: f64,
    pub description: Option<String>,
    pub is_active: bool,
}

/// Fields of an edit; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct OvertimeRulePatch {
    pub name: Option<String>,
    pub kind: Option<OvertimeType>,
    pub multiplier: Option<f64>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

pub struct OvertimeLogic;

fn check_rule(rule: &OvertimeRule) -> AppResult<()> {
    if rule.name.trim().is_empty() {
        return Err(AppError::Other("overtime rule name is required".into()));
    }
    if !rule.multiplier.is_finite() || rule.multiplier < 1.0 {
        return Err(AppError::Other(format!(
            "multiplier must be at least 1 (got {})",
            rule.multiplier
        )));
    }
    Ok(())
}

fn load(pool: &DbPool, id: i64) -> AppResult<OvertimeRule> {
    get_overtime_rule(&pool.conn, id)?
        .ok_or_else(|| AppError::NotFound(format!("Overtime rule #{}", id)))
}

impl OvertimeLogic {
    pub fn add(
        pool: &mut DbPool,
        ctx: &AuthContext,
        new: NewOvertimeRule,
    ) -> AppResult<OvertimeRule> {
        ensure(ctx, Action::ManageOvertime, Resource::Global)?;

        let mut rule = OvertimeRule {
            id: 0,
            name: new.name.trim().to_string(),
            kind: new.kind,
            multiplier: new.multiplier,
            description: new.description.filter(|d| !d.trim().is_empty()),
            is_active: new.is_active,
        };
        check_rule(&rule)?;
        rule.id = insert_overtime_rule(&pool.conn, &rule)?;

        ttlog(
            &pool.conn,
            Some(ctx.user_id),
            "overtime_add",
            &format!("#{}", rule.id),
            &format!(
                "Overtime rule {} ({}, x{})",
                rule.name,
                rule.kind.to_db_str(),
                rule.multiplier
            ),
        )?;

        Ok(rule)
    }

    /// Every rule, ordered by name, optionally filtered.
    pub fn list(
        pool: &mut DbPool,
        ctx: &AuthContext,
        active: Option<bool>,
        kind: Option<OvertimeType>,
    ) -> AppResult<Vec<OvertimeRule>> {
        ensure(ctx, Action::ManageOvertime, Resource::Global)?;
        list_overtime_rules(&pool.conn, active, kind)
    }

    pub fn show(pool: &mut DbPool, ctx: &AuthContext, id: i64) -> AppResult<OvertimeRule> {
        ensure(ctx, Action::ManageOvertime, Resource::Global)?;
        load(pool, id)
    }

    pub fn update(
        pool: &mut DbPool,
        ctx: &AuthContext,
        id: i64,
        patch: OvertimeRulePatch,
    ) -> AppResult<OvertimeRule> {
        ensure(ctx, Action::ManageOvertime, Resource::Global)?;
        let mut rule = load(pool, id)?;

        if let Some(name) = patch.name {
            rule.name = name.trim().to_string();
        }
        if let Some(kind) = patch.kind {
            rule.kind = kind;
        }
        if let Some(m) = patch.multiplier {
            rule.multiplier = m;
        }
        if let Some(d) = patch.description {
            rule.description = if d.trim().is_empty() { None } else { Some(d) };
        }
        if let Some(active) = patch.is_active {
            rule.is_active = active;
        }
        check_rule(&rule)?;

        update_overtime_rule(&pool.conn, &rule)?;
        ttlog(
            &pool.conn,
            Some(ctx.user_id),
            "overtime_edit",
            &format!("#{}", rule.id),
            &format!("Overtime rule {} updated", rule.name),
        )?;

        Ok(rule)
    }

    pub fn delete(pool: &mut DbPool, ctx: &AuthContext, id: i64) -> AppResult<OvertimeRule> {
        ensure(ctx, Action::ManageOvertime, Resource::Global)?;
        let rule = load(pool, id)?;

        delete_overtime_rule(&pool.conn, id)?;
        ttlog(
            &pool.conn,
            Some(ctx.user_id),
            "overtime_del",
            &format!("#{}", id),
            &format!("Overtime rule {} deleted", rule.name),
        )?;

        Ok(rule)
    }

    /// Active rules, readable by every user.
    pub fn active(pool: &mut DbPool) -> AppResult<Vec<OvertimeRule>> {
        list_overtime_rules(&pool.conn, Some(true), None)
    }
}
