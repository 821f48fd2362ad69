use crate::cli::parser::Commands;
use crate::config::Config;
use crate::config::migrate::{migrate_config, missing_fields};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{error, info, success, warning};

use std::process::Command;

fn default_editor() -> String {
    std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(target_os = "windows") {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        })
}

fn run_editor(editor: &str, path: &std::path::Path) -> bool {
    matches!(Command::new(editor).arg(path).status(), Ok(s) if s.success())
}

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        migrate,
        edit_config,
        editor,
    } = cmd
    {
        let path = Config::config_file();

        if *print_config {
            let yaml = serde_yaml::to_string(cfg).map_err(|e| AppError::Config(e.to_string()))?;
            println!("📄 Current configuration ({}):\n", path.display());
            println!("{}", yaml);
        }

        if *check {
            if !path.exists() {
                warning(format!("No configuration file at {}", path.display()));
            } else {
                let missing = missing_fields(&path)?;
                if missing.is_empty() {
                    success("Configuration file is complete.");
                } else {
                    warning(format!("Missing fields: {}", missing.join(", ")));
                    info("Run `timereg config --migrate` to add them with default values.");
                }
            }
        }

        if *migrate {
            if !path.exists() {
                return Err(AppError::Config(format!(
                    "no configuration file at {}; run `timereg init` first",
                    path.display()
                )));
            }
            migrate_config(&path)?;
        }

        if *edit_config {
            let fallback = default_editor();
            let requested = editor.clone().unwrap_or_else(|| fallback.clone());

            if run_editor(&requested, &path) {
                success(format!(
                    "Configuration file edited successfully using '{}'",
                    requested
                ));
            } else {
                warning(format!(
                    "Editor '{}' not available, falling back to '{}'",
                    requested, fallback
                ));
                if run_editor(&fallback, &path) {
                    success(format!(
                        "Configuration file edited successfully using fallback '{}'",
                        fallback
                    ));
                } else {
                    error(format!(
                        "Failed to edit configuration file using fallback '{}'",
                        fallback
                    ));
                }
            }
        }
    }

    Ok(())
}
