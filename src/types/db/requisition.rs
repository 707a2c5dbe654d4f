use sea_orm::entity::prelude::*;

/// Read-only view of the requisition pipeline's table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "requisitions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub department: String,
    pub status: String,
    pub created_by: i64,
    pub chief_officer_approved_by: Option<i64>,
    pub board_approved_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
