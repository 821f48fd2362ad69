use super::{coordinates, print_json, session};
use crate::cli::parser::{Commands, LocationAction};
use crate::config::Config;
use crate::core::location::LocationLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::coordinates::Coordinates;
use crate::models::location::Location;
use crate::ui::messages::{info, success};
use crate::utils::table::{Column, Table};

fn coords_label(c: Option<Coordinates>) -> String {
    c.map(|c| format!("{:.5}, {:.5}", c.latitude, c.longitude))
        .unwrap_or_else(|| "--".to_string())
}

fn location_row(l: &Location) -> Vec<String> {
    vec![
        l.id.to_string(),
        l.name.clone(),
        l.address.clone().unwrap_or_default(),
        coords_label(l.coordinates),
    ]
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Location { action } = cmd else {
        return Ok(());
    };

    match action {
        LocationAction::Add {
            name,
            address,
            lat,
            lon,
        } => {
            let coords = coordinates(lat, lon)?;
            let (mut pool, ctx) = session(cfg)?;
            let loc = LocationLogic::add(&mut pool, &ctx, name, address.as_deref(), coords)?;
            success(format!("Location #{} {} created", loc.id, loc.name));
        }

        LocationAction::Update {
            id,
            name,
            address,
            lat,
            lon,
        } => {
            let coords = coordinates(lat, lon)?;
            let (mut pool, ctx) = session(cfg)?;
            let loc = LocationLogic::update(
                &mut pool,
                &ctx,
                *id,
                name.as_deref(),
                address.as_deref(),
                coords,
            )?;
            success(format!("Location #{} {} updated", loc.id, loc.name));
        }

        LocationAction::List { json } => {
            let mut pool = DbPool::new(&cfg.database)?;
            let locations = LocationLogic::list(&mut pool)?;

            if *json {
                return print_json(&locations);
            }
            if locations.is_empty() {
                info("No locations defined.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("ID", 4),
                Column::new("NAME", 20),
                Column::new("ADDRESS", 30),
                Column::new("POSITION", 22),
            ]);
            for l in &locations {
                table.add_row(location_row(l));
            }
            print!("{}", table.render());
        }

        LocationAction::Del { id } => {
            let (mut pool, ctx) = session(cfg)?;
            LocationLogic::delete(&mut pool, &ctx, *id)?;
            success(format!("Location #{} deleted", id));
        }

        LocationAction::Nearby {
            lat,
            lon,
            radius,
            json,
        } => {
            let origin = Coordinates::new(*lat, *lon)?;
            let radius = radius.unwrap_or(cfg.nearby_radius_km);

            let mut pool = DbPool::new(&cfg.database)?;
            let found = LocationLogic::nearby(&mut pool, origin, radius)?;

            if *json {
                return print_json(&found);
            }
            if found.is_empty() {
                info(format!("No locations within {} km.", radius));
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("ID", 4),
                Column::new("NAME", 20),
                Column::new("ADDRESS", 30),
                Column::new("POSITION", 22),
                Column::new("KM", 7),
            ]);
            for n in &found {
                let mut row = location_row(&n.location);
                row.push(format!("{:.2}", n.distance_km));
                table.add_row(row);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
