//! User aggregate
//!
//! Contains the User entity and repository interface.

pub mod model;
pub mod repository;

pub use model::{normalize_email, NewUser, User, UserRole};
pub use repository::UserRepository;
