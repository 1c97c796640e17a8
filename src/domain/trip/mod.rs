//! Trip aggregate
//!
//! Contains the Trip entity, validation rules, the list query and the
//! repository interface.

pub mod filter;
pub mod model;
pub mod repository;
pub mod validation;

pub use filter::{fuel_synonyms, TripQuery};
pub use model::{FuelType, NewTrip, Trip, TripPatch, TripStatus};
pub use repository::TripRepository;
pub use validation::{
    validate_departure_date, validate_liters, validate_trip, validate_trip_report,
    ValidationReport, MAX_LITERS,
};
