//! Identity: login, registration and token verification
//!
//! Contains the `AuthService` which orchestrates login, registration and
//! bearer-token verification.

pub mod service;

pub use service::{AuthResponse, AuthService, AuthUser, RegisterCommand, TokenVerifier};
