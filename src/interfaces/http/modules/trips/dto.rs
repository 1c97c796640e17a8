//! Trip request DTOs

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::trips::parse_departure_date;
use crate::application::{CreateTripCommand, UpdateTripCommand};
use crate::domain::{FuelType, TripQuery, TripStatus};
use crate::shared::PageRequest;

/// Query string of `GET /api/trips`. Values that do not parse are ignored.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TripListParams {
    /// Page number, default 1
    pub page: Option<String>,
    /// Page size 1-100, default 10
    pub limit: Option<String>,
    /// Free text over driver, truck, origin, destination and fuel names
    pub search: Option<String>,
    /// Exact status; unknown values (e.g. `all`) are ignored
    pub status: Option<String>,
    pub driver: Option<String>,
    pub fuel: Option<String>,
    /// Earliest departure (inclusive)
    pub date_from: Option<String>,
    /// Latest departure (inclusive)
    pub date_to: Option<String>,
}

fn parse_count(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .map(|v| v.max(0) as u64)
}

impl From<TripListParams> for TripQuery {
    fn from(p: TripListParams) -> Self {
        Self {
            page: PageRequest::new(parse_count(p.page.as_deref()), parse_count(p.limit.as_deref())),
            search: p.search,
            status: p.status.and_then(|s| s.parse::<TripStatus>().ok()),
            driver: p.driver,
            fuel: p.fuel.and_then(|f| f.parse::<FuelType>().ok()),
            departure_from: p.date_from.and_then(|d| parse_departure_date(&d).ok()),
            departure_to: p.date_to.and_then(|d| parse_departure_date(&d).ok()),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripRequest {
    #[validate(length(min = 1, max = 20, message = "Truck must be 1-20 characters"))]
    #[schema(example = "ABC123")]
    pub truck: String,
    #[validate(length(min = 1, max = 100, message = "Driver must be 1-100 characters"))]
    #[schema(example = "Juan Pérez")]
    pub driver: String,
    #[validate(length(min = 1, max = 100, message = "Origin must be 1-100 characters"))]
    #[schema(example = "Refinería La Plata")]
    pub origin: String,
    #[validate(length(min = 1, max = 100, message = "Destination must be 1-100 characters"))]
    #[schema(example = "YPF Recoleta")]
    pub destination: String,
    #[schema(value_type = String, example = "Diesel")]
    pub fuel: FuelType,
    #[schema(example = 15000)]
    pub liters: i32,
    #[schema(example = "2030-07-01T08:00:00.000Z")]
    pub departure_date: String,
}

impl From<CreateTripRequest> for CreateTripCommand {
    fn from(r: CreateTripRequest) -> Self {
        Self {
            truck: r.truck,
            driver: r.driver,
            origin: r.origin,
            destination: r.destination,
            fuel: r.fuel,
            liters: r.liters,
            departure_date: r.departure_date,
        }
    }
}

/// Every field optional; only those present are written
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTripRequest {
    #[validate(length(min = 1, max = 20, message = "Truck must be 1-20 characters"))]
    pub truck: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Driver must be 1-100 characters"))]
    pub driver: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Origin must be 1-100 characters"))]
    pub origin: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Destination must be 1-100 characters"))]
    pub destination: Option<String>,
    #[schema(value_type = Option<String>)]
    pub fuel: Option<FuelType>,
    pub liters: Option<i32>,
    pub departure_date: Option<String>,
    #[schema(value_type = Option<String>, example = "In Transit")]
    pub status: Option<TripStatus>,
}

impl From<UpdateTripRequest> for UpdateTripCommand {
    fn from(r: UpdateTripRequest) -> Self {
        Self {
            truck: r.truck,
            driver: r.driver,
            origin: r.origin,
            destination: r.destination,
            fuel: r.fuel,
            liters: r.liters,
            departure_date: r.departure_date,
            status: r.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_params_normalize_into_query() {
        let params = TripListParams {
            page: Some("0".into()),
            limit: Some("500".into()),
            status: Some("all".into()),
            fuel: Some("CNG".into()),
            date_from: Some("2030-01-01".into()),
            date_to: Some("garbage".into()),
            ..Default::default()
        };
        let query = TripQuery::from(params);

        assert_eq!(query.page.page, 1);
        assert_eq!(query.page.limit, 100);
        assert_eq!(query.status, None);
        assert_eq!(query.fuel, Some(FuelType::Cng));
        assert!(query.departure_from.is_some());
        assert!(query.departure_to.is_none());
    }

    #[test]
    fn non_numeric_paging_falls_back_to_defaults() {
        let query = TripQuery::from(TripListParams {
            page: Some("abc".into()),
            limit: Some("-4".into()),
            status: Some("In Transit".into()),
            ..Default::default()
        });
        assert_eq!(query.page.page, 1);
        assert_eq!(query.page.limit, 1);
        assert_eq!(query.status, Some(TripStatus::InTransit));
    }
}
