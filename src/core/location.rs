use crate::auth::{Action, AuthContext, Resource, ensure};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::locations::{
    delete_location, get_location, insert_location, list_locations, update_location,
};
use crate::errors::{AppError, AppResult};
use crate::models::coordinates::Coordinates;
use crate::models::location::Location;
use serde::Serialize;

const MIN_RADIUS_KM: f64 = 0.1;
const MAX_RADIUS_KM: f64 = 50.0;

/// A location together with its distance from the search origin.
#[derive(Debug, Clone, Serialize)]
pub struct NearbyLocation {
    #[serde(flatten)]
    pub location: Location,
    pub distance_km: f64,
}

pub struct LocationLogic;

impl LocationLogic {
    pub fn add(
        pool: &mut DbPool,
        ctx: &AuthContext,
        name: &str,
        address: Option<&str>,
        coordinates: Option<Coordinates>,
    ) -> AppResult<Location> {
        ensure(ctx, Action::ManageLocations, Resource::Global)?;

        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Other("location name is required".into()));
        }

        let id = insert_location(&pool.conn, name, address, coordinates)?;
        ttlog(
            &pool.conn,
            Some(ctx.user_id),
            "location_add",
            &format!("#{}", id),
            &format!("Location {} created", name),
        )?;

        Ok(Location {
            id,
            name: name.to_string(),
            address: address.map(str::to_string),
            coordinates,
        })
    }

    pub fn update(
        pool: &mut DbPool,
        ctx: &AuthContext,
        id: i64,
        name: Option<&str>,
        address: Option<&str>,
        coordinates: Option<Coordinates>,
    ) -> AppResult<Location> {
        ensure(ctx, Action::ManageLocations, Resource::Global)?;

        let mut loc = get_location(&pool.conn, id)?
            .ok_or_else(|| AppError::NotFound(format!("Location #{}", id)))?;

        if let Some(n) = name {
            let n = n.trim();
            if n.is_empty() {
                return Err(AppError::Other("location name is required".into()));
            }
            loc.name = n.to_string();
        }
        if let Some(a) = address {
            loc.address = Some(a.to_string());
        }
        if coordinates.is_some() {
            loc.coordinates = coordinates;
        }

        update_location(&pool.conn, &loc)?;
        ttlog(
            &pool.conn,
            Some(ctx.user_id),
            "location_edit",
            &format!("#{}", id),
            &format!("Location {} updated", loc.name),
        )?;

        Ok(loc)
    }

    pub fn list(pool: &mut DbPool) -> AppResult<Vec<Location>> {
        list_locations(&pool.conn)
    }

    pub fn delete(pool: &mut DbPool, ctx: &AuthContext, id: i64) -> AppResult<()> {
        ensure(ctx, Action::DeleteLocation, Resource::Global)?;

        if delete_location(&pool.conn, id)? == 0 {
            return Err(AppError::NotFound(format!("Location #{}", id)));
        }

        ttlog(
            &pool.conn,
            Some(ctx.user_id),
            "location_del",
            &format!("#{}", id),
            "Location deleted",
        )?;
        Ok(())
    }

    /// Locations within `radius_km` of `origin`, closest first.
    /// Locations without coordinates are never returned.
    pub fn nearby(
        pool: &mut DbPool,
        origin: Coordinates,
        radius_km: f64,
    ) -> AppResult<Vec<NearbyLocation>> {
        Self::filter_nearby(list_locations(&pool.conn)?, origin, radius_km)
    }

    pub fn filter_nearby(
        locations: Vec<Location>,
        origin: Coordinates,
        radius_km: f64,
    ) -> AppResult<Vec<NearbyLocation>> {
        if !(MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&radius_km) {
            return Err(AppError::InvalidRadius(radius_km));
        }

        let mut out: Vec<NearbyLocation> = locations
            .into_iter()
            .filter_map(|location| {
                let distance_km = location.coordinates?.distance_km(&origin);
                (distance_km <= radius_km).then_some(NearbyLocation {
                    location,
                    distance_km,
                })
            })
            .collect();

        out.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        Ok(out)
    }
}
