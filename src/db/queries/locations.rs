use crate::errors::AppResult;
use crate::models::coordinates::Coordinates;
use crate::models::location::Location;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_location(row: &Row) -> Result<Location> {
    let latitude: Option<f64> = row.get("latitude")?;
    let longitude: Option<f64> = row.get("longitude")?;

    Ok(Location {
        id: row.get("id")?,
        name: row.get("name")?,
        address: row.get("address")?,
        coordinates: Coordinates::from_pair(latitude, longitude).ok().flatten(),
    })
}

pub fn insert_location(
    conn: &Connection,
    name: &str,
    address: Option<&str>,
    coordinates: Option<Coordinates>,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO locations (name, address, latitude, longitude) VALUES (?1, ?2, ?3, ?4)",
        params![
            name,
            address,
            coordinates.map(|c| c.latitude),
            coordinates.map(|c| c.longitude)
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_location(conn: &Connection, loc: &Location) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE locations SET name = ?1, address = ?2, latitude = ?3, longitude = ?4
         WHERE id = ?5",
        params![
            loc.name,
            loc.address,
            loc.coordinates.map(|c| c.latitude),
            loc.coordinates.map(|c| c.longitude),
            loc.id
        ],
    )?)
}

pub fn get_location(conn: &Connection, id: i64) -> AppResult<Option<Location>> {
    let loc = conn
        .query_row("SELECT * FROM locations WHERE id = ?1", [id], map_location)
        .optional()?;
    Ok(loc)
}

pub fn list_locations(conn: &Connection) -> AppResult<Vec<Location>> {
    let mut stmt = conn.prepare("SELECT * FROM locations ORDER BY name ASC")?;
    let rows = stmt.query_map([], map_location)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn delete_location(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM locations WHERE id = ?1", [id])?)
}
