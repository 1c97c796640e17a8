//! Database entities module

pub mod trip;
pub mod user;

pub use trip::Entity as Trip;
pub use user::Entity as User;
