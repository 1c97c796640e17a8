//! # Fuel Track
//!
//! REST API for scheduling and tracking fuel delivery trips.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Trip and user entities, validation rules, repository traits
//! - **application**: Use-cases (trip lifecycle, authentication)
//! - **infrastructure**: SeaORM and in-memory repositories, JWT, bcrypt, seeding
//! - **interfaces**: HTTP router, handlers, auth guard, rate limiting
//! - **shared**: Errors, pagination, shutdown coordination

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_database, DatabaseConfig, Repositories};

pub use interfaces::http::create_api_router;
