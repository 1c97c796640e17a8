//! Trip use-case inputs and response shapes

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DomainError, DomainResult, FuelType, Trip, TripStatus};
use crate::shared::PaginationMeta;

/// Input for creating a trip. Status is always forced to Scheduled.
#[derive(Debug, Clone)]
pub struct CreateTripCommand {
    pub truck: String,
    pub driver: String,
    pub origin: String,
    pub destination: String,
    pub fuel: FuelType,
    pub liters: i32,
    /// ISO 8601 date-time
    pub departure_date: String,
}

/// Partial update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateTripCommand {
    pub truck: Option<String>,
    pub driver: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub fuel: Option<FuelType>,
    pub liters: Option<i32>,
    pub departure_date: Option<String>,
    pub status: Option<TripStatus>,
}

/// Trip as returned over the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripResponse {
    pub id: String,
    #[schema(example = "ABC123")]
    pub truck: String,
    #[schema(example = "Juan Pérez")]
    pub driver: String,
    pub origin: String,
    pub destination: String,
    #[schema(value_type = String, example = "Diesel")]
    pub fuel: FuelType,
    #[schema(example = 15000)]
    pub liters: i32,
    /// ISO 8601, millisecond precision, UTC
    #[schema(example = "2025-07-01T08:00:00.000Z")]
    pub departure_date: String,
    #[schema(value_type = String, example = "Scheduled")]
    pub status: TripStatus,
    /// Empty when the store did not record it
    pub created_at: String,
    pub updated_at: String,
}

impl From<Trip> for TripResponse {
    fn from(t: Trip) -> Self {
        Self {
            id: t.id,
            truck: t.truck,
            driver: t.driver,
            origin: t.origin,
            destination: t.destination,
            fuel: t.fuel,
            liters: t.liters,
            departure_date: to_iso(t.departure_date),
            status: t.status,
            created_at: t.created_at.map(to_iso).unwrap_or_default(),
            updated_at: t.updated_at.map(to_iso).unwrap_or_default(),
        }
    }
}

/// Page of trips plus pagination metadata
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedTrips {
    pub data: Vec<TripResponse>,
    pub pagination: PaginationMeta,
}

pub fn to_iso(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an RFC 3339 timestamp; offset-less date-times and bare dates are
/// taken as UTC.
pub fn parse_departure_date(raw: &str) -> DomainResult<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }

    Err(DomainError::validation(format!(
        "Invalid departure date: {}",
        raw
    )))
}
