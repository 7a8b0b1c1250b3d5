use async_trait::async_trait;
use uuid::Uuid;

use super::model::Calculation;

#[async_trait]
pub trait CalculationsRepository: Send + Sync {
    async fn insert(&self, calculation: &Calculation) -> anyhow::Result<()>;

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Calculation>>;

    async fn list_by_owner(&self, user_id: Uuid) -> anyhow::Result<Vec<Calculation>>;

    async fn update(&self, calculation: &Calculation) -> anyhow::Result<()>;

    async fn delete(&self, id: Uuid) -> anyhow::Result<()>;
}
