//! Trip business rules

use chrono::{DateTime, Utc};

use super::model::TripPatch;
use crate::domain::{DomainError, DomainResult};

pub const MAX_LITERS: i32 = 30_000;

pub fn validate_liters(liters: i32) -> DomainResult<()> {
    if liters <= 0 {
        return Err(DomainError::validation("Liters must be greater than 0"));
    }
    if liters > MAX_LITERS {
        return Err(DomainError::validation(format!(
            "Liters cannot exceed {}",
            MAX_LITERS
        )));
    }
    Ok(())
}

/// Fails when `date` lies before the current instant.
pub fn validate_departure_date(date: DateTime<Utc>) -> DomainResult<()> {
    validate_departure_date_at(date, Utc::now())
}

pub(crate) fn validate_departure_date_at(
    date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> DomainResult<()> {
    if date < now {
        return Err(DomainError::validation(
            "Departure date cannot be in the past",
        ));
    }
    Ok(())
}

/// Fail-fast validation of the fields present on `patch`.
pub fn validate_trip(patch: &TripPatch) -> DomainResult<()> {
    if let Some(liters) = patch.liters {
        validate_liters(liters)?;
    }
    if let Some(date) = patch.departure_date {
        validate_departure_date(date)?;
    }
    Ok(())
}

/// Outcome of [`validate_trip_report`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Collects every failure instead of stopping at the first one.
pub fn validate_trip_report(patch: &TripPatch) -> ValidationReport {
    let checks = [
        patch.liters.map(validate_liters),
        patch.departure_date.map(validate_departure_date),
    ];

    let errors: Vec<String> = checks
        .into_iter()
        .flatten()
        .filter_map(|r| r.err())
        .map(|e| e.to_string())
        .collect();

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}
