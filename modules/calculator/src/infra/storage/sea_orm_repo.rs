use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::domain::model::Calculation;
use crate::domain::repo::CalculationsRepository;

use super::entity::{self, Entity as CalculationEntity};

pub struct SeaOrmCalculationsRepository {
    db: DatabaseConnection,
}

impl SeaOrmCalculationsRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CalculationsRepository for SeaOrmCalculationsRepository {
    async fn insert(&self, calculation: &Calculation) -> anyhow::Result<()> {
        let active_model: entity::ActiveModel = calculation.into();
        active_model.insert(&self.db).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Calculation>> {
        let found = CalculationEntity::find_by_id(id).one(&self.db).await?;
        Ok(found.map(Into::into))
    }

    async fn list_by_owner(&self, user_id: Uuid) -> anyhow::Result<Vec<Calculation>> {
        let rows = CalculationEntity::find()
            .filter(entity::Column::UserId.eq(user_id))
            .order_by_asc(entity::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, calculation: &Calculation) -> anyhow::Result<()> {
        let active_model: entity::ActiveModel = calculation.into();
        active_model.update(&self.db).await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        CalculationEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}
