//! Trip use-cases

pub mod dto;
pub mod service;

pub use dto::{
    parse_departure_date, CreateTripCommand, PaginatedTrips, TripResponse, UpdateTripCommand,
};
pub use service::TripService;
