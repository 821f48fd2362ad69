use super::{coordinates, print_json, session};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::ClockLogic;
use crate::core::settings::SettingsLogic;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::colors::{CYAN, GREEN, RESET};
use crate::utils::formatting::hours_label;
use crate::utils::time::resolve_now;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    match cmd {
        Commands::ClockIn { lat, lon, at } => {
            let now = resolve_now(at.as_ref())?;
            let coords = coordinates(lat, lon)?;
            let (mut pool, ctx) = session(cfg)?;

            let reg = ClockLogic::clock_in(&mut pool, &ctx, now, coords)?;
            success(format!(
                "Clocked in at {} on {} (registration #{})",
                reg.clock_in_str(),
                reg.date_str(),
                reg.id
            ));
        }

        Commands::ClockOut { lat, lon, at } => {
            let now = resolve_now(at.as_ref())?;
            let coords = coordinates(lat, lon)?;
            let (mut pool, ctx) = session(cfg)?;

            let reg = ClockLogic::clock_out(&mut pool, &ctx, now, coords)?;
            success(format!(
                "Clocked out at {} ({}-{}, {} h)",
                reg.clock_out_str(),
                reg.clock_in_str(),
                reg.clock_out_str(),
                hours_label(reg.total_hours)
            ));
        }

        Commands::Status { at, json } => {
            let now = resolve_now(at.as_ref())?;
            let (mut pool, ctx) = session(cfg)?;

            let status = ClockLogic::status(&mut pool, &ctx, now)?;
            if *json {
                return print_json(&status);
            }

            match &status.registration {
                Some(reg) => {
                    let format = SettingsLogic::get(&mut pool, &ctx)?.time_format;
                    println!(
                        "{}● Clocked in{} since {}",
                        GREEN,
                        RESET,
                        reg.clock_in.format(format.clock_pattern())
                    );
                    if let Some(elapsed) = &status.elapsed {
                        println!("{}⏱  Elapsed:{} {}", CYAN, RESET, elapsed);
                    }
                }
                None => info(format!("Not clocked in on {}.", now.date())),
            }
        }

        _ => {}
    }

    Ok(())
}
