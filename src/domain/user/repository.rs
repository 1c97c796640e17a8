use async_trait::async_trait;

use super::{NewUser, User};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Lookup by already-normalized email.
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    /// Fails with `Conflict` when the email is taken.
    async fn create(&self, user: NewUser) -> DomainResult<User>;
    async fn count(&self) -> DomainResult<u64>;
}
