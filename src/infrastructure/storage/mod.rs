//! Non-SQL storage implementations

mod memory;

pub use memory::{InMemoryTripRepository, InMemoryUserRepository};
