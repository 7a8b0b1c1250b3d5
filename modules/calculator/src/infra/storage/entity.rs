use sea_orm::entity::prelude::*;

use crate::domain::model::Calculation;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "calculations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub a: Decimal,
    pub b: Decimal,
    pub operation: String,
    pub result: Decimal,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Calculation {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            a: model.a,
            b: model.b,
            operation: model.operation,
            result: model.result,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<&Calculation> for ActiveModel {
    fn from(calculation: &Calculation) -> Self {
        use sea_orm::ActiveValue::Set;

        Self {
            id: Set(calculation.id),
            user_id: Set(calculation.user_id),
            a: Set(calculation.a),
            b: Set(calculation.b),
            operation: Set(calculation.operation.clone()),
            result: Set(calculation.result),
            created_at: Set(calculation.created_at),
            updated_at: Set(calculation.updated_at),
        }
    }
}
