use crate::auth::AuthContext;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::settings::{get_settings, save_settings};
use crate::errors::AppResult;
use crate::models::settings::{DefaultView, TimeFormat, UserSettings};

/// Fields of a settings change; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub enable_notifications: Option<bool>,
    pub auto_clock_out: Option<bool>,
    pub default_view: Option<DefaultView>,
    pub time_format: Option<TimeFormat>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.enable_notifications.is_none()
            && self.auto_clock_out.is_none()
            && self.default_view.is_none()
            && self.time_format.is_none()
    }
}

/// Preferences of the acting user. Always scoped to `ctx.user_id`.
pub struct SettingsLogic;

impl SettingsLogic {
    /// Stored settings, or the defaults (saved on first read).
    pub fn get(pool: &mut DbPool, ctx: &AuthContext) -> AppResult<UserSettings> {
        if let Some(s) = get_settings(&pool.conn, ctx.user_id)? {
            return Ok(s);
        }
        let s = UserSettings::defaults_for(ctx.user_id);
        save_settings(&pool.conn, &s)?;
        Ok(s)
    }

    pub fn update(
        pool: &mut DbPool,
        ctx: &AuthContext,
        patch: SettingsPatch,
    ) -> AppResult<UserSettings> {
        let mut s = Self::get(pool, ctx)?;

        if let Some(v) = patch.enable_notifications {
            s.enable_notifications = v;
        }
        if let Some(v) = patch.auto_clock_out {
            s.auto_clock_out = v;
        }
        if let Some(v) = patch.default_view {
            s.default_view = v;
        }
        if let Some(v) = patch.time_format {
            s.time_format = v;
        }

        save_settings(&pool.conn, &s)?;
        ttlog(
            &pool.conn,
            Some(ctx.user_id),
            "settings_edit",
            "",
            &format!(
                "notifications={} auto_clock_out={} view={} time={}",
                s.enable_notifications,
                s.auto_clock_out,
                s.default_view.to_db_str(),
                s.time_format.to_db_str()
            ),
        )?;

        Ok(s)
    }
}
