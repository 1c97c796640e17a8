//! Domain layer
//!
//! Entities, business rules and repository contracts. Nothing in here knows
//! about HTTP or the database engine.

pub mod trip;
pub mod user;

pub use trip::{
    fuel_synonyms, validate_trip, FuelType, NewTrip, Trip, TripPatch, TripQuery, TripRepository,
    TripStatus,
};
pub use user::{normalize_email, NewUser, User, UserRepository, UserRole};

pub use crate::shared::errors::{DomainError, DomainResult};
