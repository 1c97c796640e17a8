//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories.

pub mod trip_repository;
pub mod user_repository;

pub use trip_repository::SeaOrmTripRepository;
pub use user_repository::SeaOrmUserRepository;
