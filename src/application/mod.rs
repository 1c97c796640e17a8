//! Application layer - use-cases over the domain repositories

pub mod identity;
pub mod trips;

pub use identity::{AuthResponse, AuthService, AuthUser, RegisterCommand, TokenVerifier};
pub use trips::{
    CreateTripCommand, PaginatedTrips, TripResponse, TripService, UpdateTripCommand,
};
