use super::{print_json, session};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::settings::{SettingsLogic, SettingsPatch};
use crate::errors::{AppError, AppResult};
use crate::models::settings::{DefaultView, TimeFormat, UserSettings};
use crate::ui::messages::{header, success};

fn print_settings(s: &UserSettings) {
    println!("notifications:   {}", s.enable_notifications);
    println!("auto clock-out:  {}", s.auto_clock_out);
    println!("default view:    {}", s.default_view.to_db_str());
    println!("time format:     {}", s.time_format.to_db_str());
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Settings {
        notifications,
        auto_clock_out,
        default_view,
        time_format,
        json,
    } = cmd
    else {
        return Ok(());
    };

    let patch = SettingsPatch {
        enable_notifications: *notifications,
        auto_clock_out: *auto_clock_out,
        default_view: default_view
            .as_deref()
            .map(|v| {
                DefaultView::from_db_str(&v.trim().to_lowercase()).ok_or_else(|| {
                    AppError::InvalidSetting(format!(
                        "default view '{}' (dashboard, time-registrations or reports)",
                        v
                    ))
                })
            })
            .transpose()?,
        time_format: time_format
            .as_deref()
            .map(|f| {
                TimeFormat::from_db_str(&f.trim().to_lowercase())
                    .ok_or_else(|| AppError::InvalidSetting(format!("time format '{}' (12h or 24h)", f)))
            })
            .transpose()?,
    };

    let (mut pool, ctx) = session(cfg)?;
    let settings = if patch.is_empty() {
        SettingsLogic::get(&mut pool, &ctx)?
    } else {
        let s = SettingsLogic::update(&mut pool, &ctx, patch)?;
        if !*json {
            success("Settings saved.");
        }
        s
    };

    if *json {
        return print_json(&settings);
    }
    header("Your settings");
    print_settings(&settings);
    Ok(())
}
