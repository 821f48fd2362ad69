use super::coordinates::Coordinates;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub coordinates: Option<Coordinates>,
}
