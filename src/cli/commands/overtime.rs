use super::{print_json, session};
use crate::cli::parser::{Commands, OvertimeAction};
use crate::config::Config;
use crate::core::overtime::{NewOvertimeRule, OvertimeLogic, OvertimeRulePatch};
use crate::errors::{AppError, AppResult};
use crate::models::overtime::{OvertimeRule, OvertimeType};
use crate::ui::messages::{info, success};
use crate::utils::table::{Column, Table};

fn parse_type(s: &str) -> AppResult<OvertimeType> {
    OvertimeType::from_code(s).ok_or_else(|| AppError::InvalidOvertimeType(s.to_string()))
}

fn print_rules(rules: &[OvertimeRule]) {
    if rules.is_empty() {
        info("No overtime rules defined.");
        return;
    }

    let mut table = Table::new(vec![
        Column::new("ID", 4),
        Column::new("NAME", 20),
        Column::new("TYPE", 15),
        Column::new("MULT", 5),
        Column::new("ACTIVE", 6),
        Column::new("DESCRIPTION", 40),
    ]);
    for r in rules {
        table.add_row(vec![
            r.id.to_string(),
            r.name.clone(),
            r.kind.to_db_str().to_string(),
            format!("{:.2}", r.multiplier),
            if r.is_active { "yes" } else { "no" }.to_string(),
            r.description.clone().unwrap_or_default(),
        ]);
    }
    print!("{}", table.render());
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Overtime { action } = cmd else {
        return Ok(());
    };

    match action {
        OvertimeAction::Add {
            name,
            kind,
            multiplier,
            description,
            inactive,
        } => {
            let new = NewOvertimeRule {
                name: name.clone(),
                kind: parse_type(kind)?,
                multiplier: *multiplier,
                description: description.clone(),
                is_active: !*inactive,
            };
            let (mut pool, ctx) = session(cfg)?;
            let rule = OvertimeLogic::add(&mut pool, &ctx, new)?;
            success(format!(
                "Overtime rule #{} {} created (x{:.2})",
                rule.id, rule.name, rule.multiplier
            ));
        }

        OvertimeAction::List { active, kind, json } => {
            let kind = kind.as_deref().map(parse_type).transpose()?;
            let (mut pool, ctx) = session(cfg)?;
            let rules = OvertimeLogic::list(&mut pool, &ctx, *active, kind)?;

            if *json {
                return print_json(&rules);
            }
            print_rules(&rules);
        }

        OvertimeAction::Show { id, json } => {
            let (mut pool, ctx) = session(cfg)?;
            let rule = OvertimeLogic::show(&mut pool, &ctx, *id)?;

            if *json {
                return print_json(&rule);
            }
            print_rules(std::slice::from_ref(&rule));
        }

        OvertimeAction::Update {
            id,
            name,
            kind,
            multiplier,
            description,
            active,
        } => {
            let patch = OvertimeRulePatch {
                name: name.clone(),
                kind: kind.as_deref().map(parse_type).transpose()?,
                multiplier: *multiplier,
                description: description.clone(),
                is_active: *active,
            };
            let (mut pool, ctx) = session(cfg)?;
            let rule = OvertimeLogic::update(&mut pool, &ctx, *id, patch)?;
            success(format!("Overtime rule #{} {} updated", rule.id, rule.name));
        }

        OvertimeAction::Del { id } => {
            let (mut pool, ctx) = session(cfg)?;
            let rule = OvertimeLogic::delete(&mut pool, &ctx, *id)?;
            success(format!("Overtime rule #{} {} deleted", rule.id, rule.name));
        }

        OvertimeAction::Active { json } => {
            // any known user may read the rules in force
            let (mut pool, _ctx) = session(cfg)?;
            let rules = OvertimeLogic::active(&mut pool)?;

            if *json {
                return print_json(&rules);
            }
            print_rules(&rules);
        }
    }

    Ok(())
}
