use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Relay transition recorded in the audit trail. Stored wire values are the
/// device's native command names.
#[derive(
    Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum RelayAction {
    #[sea_orm(string_value = "encender")]
    #[serde(rename = "encender")]
    TurnOn,
    #[sea_orm(string_value = "apagar")]
    #[serde(rename = "apagar")]
    TurnOff,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "device_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub action: RelayAction,
    pub user_email: String,
    pub enroll_id: String,
    pub logged_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
