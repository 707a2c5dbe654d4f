use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_accounts_tables::Users;

/// Requisition and candidate tables. Their workflows are owned elsewhere;
/// this service only reads them to build dashboards.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Requisitions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Requisitions::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Requisitions::Title).string().not_null())
                    .col(ColumnDef::new(Requisitions::Department).string().not_null())
                    .col(ColumnDef::new(Requisitions::Status).string_len(40).not_null())
                    .col(ColumnDef::new(Requisitions::CreatedBy).big_integer().not_null())
                    .col(ColumnDef::new(Requisitions::ChiefOfficerApprovedBy).big_integer().null())
                    .col(ColumnDef::new(Requisitions::BoardApprovedAt).big_integer().null())
                    .col(ColumnDef::new(Requisitions::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_requisitions_created_by")
                            .from(Requisitions::Table, Requisitions::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_requisitions_chief_officer_approved_by")
                            .from(Requisitions::Table, Requisitions::ChiefOfficerApprovedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_requisitions_status")
                    .table(Requisitions::Table)
                    .col(Requisitions::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_requisitions_created_by")
                    .table(Requisitions::Table)
                    .col(Requisitions::CreatedBy)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Candidates::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Candidates::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Candidates::FullName).string().not_null())
                    .col(ColumnDef::new(Candidates::Email).string().not_null())
                    .col(ColumnDef::new(Candidates::RequisitionId).big_integer().null())
                    .col(ColumnDef::new(Candidates::Stage).string_len(30).not_null().default("APPLIED"))
                    .col(ColumnDef::new(Candidates::AppliedDate).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_candidates_requisition_id")
                            .from(Candidates::Table, Candidates::RequisitionId)
                            .to(Requisitions::Table, Requisitions::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_candidates_stage")
                    .table(Candidates::Table)
                    .col(Candidates::Stage)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Candidates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Requisitions::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Requisitions {
    Table,
    Id,
    Title,
    Department,
    Status,
    CreatedBy,
    ChiefOfficerApprovedBy,
    BoardApprovedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Candidates {
    Table,
    Id,
    FullName,
    Email,
    RequisitionId,
    Stage,
    AppliedDate,
}
