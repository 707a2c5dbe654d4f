use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_accounts_tables::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserActivityLog::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserActivityLog::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(UserActivityLog::UserId).big_integer().not_null())
                    .col(ColumnDef::new(UserActivityLog::Action).string_len(255).not_null())
                    .col(ColumnDef::new(UserActivityLog::IpAddress).string().null())
                    .col(ColumnDef::new(UserActivityLog::UserAgent).text().not_null().default(""))
                    .col(ColumnDef::new(UserActivityLog::Timestamp).big_integer().not_null())
                    .col(ColumnDef::new(UserActivityLog::Data).text().not_null().default("{}"))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_activity_log_user_id")
                            .from(UserActivityLog::Table, UserActivityLog::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_activity_log_user_timestamp")
                    .table(UserActivityLog::Table)
                    .col(UserActivityLog::UserId)
                    .col(UserActivityLog::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_activity_log_action")
                    .table(UserActivityLog::Table)
                    .col(UserActivityLog::Action)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserActivityLog::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum UserActivityLog {
    Table,
    Id,
    UserId,
    Action,
    IpAddress,
    UserAgent,
    Timestamp,
    Data,
}
