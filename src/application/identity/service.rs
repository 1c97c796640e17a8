//! Authentication service
//!
//! Login, registration and token verification. HTTP handlers and the auth
//! guard are thin wrappers over this service.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::domain::{
    normalize_email, DomainError, DomainResult, NewUser, User, UserRepository, UserRole,
};
use crate::infrastructure::crypto::jwt::{create_token, verify_token, JwtConfig, TokenClaims};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::shared::errors::InfraError;

/// User fields safe to hand back to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuthUser {
    pub id: String,
    #[schema(example = "admin@trucking.com")]
    pub email: String,
    pub name: String,
    #[schema(example = "operator")]
    pub role: String,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.as_str().to_string(),
        }
    }
}

/// Issued token plus the sanitized user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: AuthUser,
}

#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub email: String,
    pub password: String,
    pub name: String,
    /// `admin` or `operator`; absent means operator
    pub role: Option<String>,
}

/// Anything that can turn a bearer token into verified claims
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Option<TokenClaims>;
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt_config: JwtConfig,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt_config: JwtConfig, bcrypt_cost: u32) -> Self {
        Self {
            users,
            jwt_config,
            bcrypt_cost,
        }
    }

    // ── Authentication ──────────────────────────────────────────

    /// `None` for unknown email, wrong password, or any internal failure.
    pub async fn login(&self, email: &str, password: &str) -> Option<AuthResponse> {
        match self.try_login(email, password).await {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "Login failed with internal error");
                None
            }
        }
    }

    async fn try_login(&self, email: &str, password: &str) -> DomainResult<Option<AuthResponse>> {
        let email = normalize_email(email);
        let Some(user) = self.users.find_by_email(&email).await? else {
            warn!(%email, "Login attempt for unknown email");
            return Ok(None);
        };

        let valid = verify_password(password, &user.password_hash).map_err(InfraError::from)?;
        if !valid {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            return Ok(None);
        }

        info!(user_id = %user.id, "User logged in");
        self.issue(&user).map(Some)
    }

    // ── Registration ────────────────────────────────────────────

    pub async fn register(&self, cmd: RegisterCommand) -> DomainResult<AuthResponse> {
        let email = normalize_email(&cmd.email);
        let role = match cmd.role.as_deref().map(str::trim) {
            None | Some("") => UserRole::default(),
            Some(raw) => raw.parse()?,
        };

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict(
                "User already exists with this email".into(),
            ));
        }

        let password_hash =
            hash_password(&cmd.password, self.bcrypt_cost).map_err(InfraError::from)?;

        let user = self
            .users
            .create(NewUser {
                email,
                password_hash,
                name: cmd.name.trim().to_string(),
                role,
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "New user registered");
        self.issue(&user)
    }

    pub fn verify_token(&self, token: &str) -> Option<TokenClaims> {
        verify_token(token, &self.jwt_config).ok()
    }

    fn issue(&self, user: &User) -> DomainResult<AuthResponse> {
        let token = create_token(user, &self.jwt_config).map_err(InfraError::from)?;
        Ok(AuthResponse {
            token,
            user: AuthUser::from(user),
        })
    }
}

impl TokenVerifier for AuthService {
    fn verify(&self, token: &str) -> Option<TokenClaims> {
        self.verify_token(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemoryUserRepository;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            JwtConfig::new("test-secret", 24),
            4,
        )
    }

    fn register_cmd(email: &str, role: Option<&str>) -> RegisterCommand {
        RegisterCommand {
            email: email.into(),
            password: "secret123".into(),
            name: "  Test User ".into(),
            role: role.map(String::from),
        }
    }

    #[tokio::test]
    async fn register_then_login() {
        let svc = service();
        let registered = svc
            .register(register_cmd("New@Trucking.com", None))
            .await
            .unwrap();
        assert_eq!(registered.user.email, "new@trucking.com");
        assert_eq!(registered.user.name, "Test User");
        assert_eq!(registered.user.role, "operator");

        let claims = svc.verify_token(&registered.token).unwrap();
        assert_eq!(claims.user_id, registered.user.id);

        let login = svc.login(" NEW@trucking.com ", "secret123").await.unwrap();
        assert_eq!(login.user.id, registered.user.id);
    }

    #[tokio::test]
    async fn login_failures_are_none() {
        let svc = service();
        svc.register(register_cmd("a@b.com", Some("admin"))).await.unwrap();

        assert!(svc.login("a@b.com", "wrong").await.is_none());
        assert!(svc.login("nobody@b.com", "secret123").await.is_none());
    }

    #[tokio::test]
    async fn duplicate_email_conflicts_case_insensitively() {
        let svc = service();
        svc.register(register_cmd("dup@b.com", None)).await.unwrap();

        let err = svc.register(register_cmd("DUP@b.com", None)).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(ref m) if m == "User already exists with this email"));
    }

    #[tokio::test]
    async fn invalid_role_is_rejected() {
        let err = service()
            .register(register_cmd("r@b.com", Some("superuser")))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn garbage_token_does_not_verify() {
        assert!(service().verify("not.a.token").is_none());
    }
}
