use async_trait::async_trait;
use uuid::Uuid;

use super::model::User;

#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn insert(&self, user: &User) -> anyhow::Result<()>;

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;

    /// Either coordinate taken makes a registration a duplicate.
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> anyhow::Result<Option<User>>;
}
