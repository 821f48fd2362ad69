use crate::errors::{AppError, AppResult};
use serde::Serialize;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A GPS position. Only ever built from real input: there is no fallback
/// that makes one up when the client did not send any.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> AppResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(AppError::InvalidCoordinates(format!(
                "latitude {} out of range [-90, 90]",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(AppError::InvalidCoordinates(format!(
                "longitude {} out of range [-180, 180]",
                longitude
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build from two optional DB/CLI columns: both present or nothing.
    pub fn from_pair(latitude: Option<f64>, longitude: Option<f64>) -> AppResult<Option<Self>> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Ok(Some(Self::new(lat, lon)?)),
            (None, None) => Ok(None),
            _ => Err(AppError::InvalidCoordinates(
                "latitude and longitude must be given together".into(),
            )),
        }
    }

    /// Great-circle distance in kilometres (haversine).
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}
