use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::model::{Calculation, CalculationPatch, NewCalculation};

/// A persisted calculation as returned by the API. Decimals are serialized
/// as strings to keep their precision out of JSON float territory.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CalculationDto {
    #[schema(value_type = String)]
    pub id: Uuid,
    #[schema(value_type = String)]
    pub user_id: Uuid,
    #[schema(value_type = String, example = "10")]
    pub a: Decimal,
    #[schema(value_type = String, example = "5")]
    pub b: Decimal,
    /// Canonical uppercase operation name.
    #[serde(rename = "type")]
    #[schema(example = "ADD")]
    pub operation: String,
    #[schema(value_type = String, example = "15")]
    pub result: Decimal,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub updated_at: DateTime<Utc>,
}

impl From<Calculation> for CalculationDto {
    fn from(calculation: Calculation) -> Self {
        Self {
            id: calculation.id,
            user_id: calculation.user_id,
            a: calculation.a,
            b: calculation.b,
            operation: calculation.operation,
            result: calculation.result,
            created_at: calculation.created_at,
            updated_at: calculation.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCalculationRequest {
    #[schema(value_type = String, example = "10")]
    pub a: Decimal,
    #[schema(value_type = String, example = "5")]
    pub b: Decimal,
    /// Operation name, matched case-insensitively.
    #[serde(rename = "type")]
    #[schema(example = "add")]
    pub operation: String,
}

impl From<CreateCalculationRequest> for NewCalculation {
    fn from(req: CreateCalculationRequest) -> Self {
        Self {
            a: req.a,
            b: req.b,
            operation: req.operation,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PatchCalculationRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub a: Option<Decimal>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub b: Option<Decimal>,
    #[serde(default, rename = "type")]
    pub operation: Option<String>,
}

impl From<PatchCalculationRequest> for CalculationPatch {
    fn from(req: PatchCalculationRequest) -> Self {
        Self {
            a: req.a,
            b: req.b,
            operation: req.operation,
        }
    }
}

/// Operands for the stateless calculate endpoint.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct CalculateQuery {
    #[param(value_type = String, example = "12")]
    pub a: Decimal,
    #[param(value_type = String, example = "4")]
    pub b: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CalculateResponse {
    #[schema(value_type = String, example = "3")]
    pub result: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OperationsResponse {
    /// Sorted canonical operation names.
    pub operations: Vec<String>,
}
