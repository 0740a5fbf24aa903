//! Producer (manufacturer) models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::ProducerId;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct Producer {
    pub id: ProducerId,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProducerRequest {
    #[validate(length(min = 3, max = 30))]
    #[schema(example = "Epson")]
    pub name: String,
    #[validate(length(min = 5, max = 300))]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProducerRequest {
    #[validate(length(min = 3, max = 30))]
    pub name: Option<String>,
    #[validate(length(min = 5, max = 300))]
    pub description: Option<String>,
}
