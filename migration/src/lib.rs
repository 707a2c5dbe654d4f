pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_accounts_tables;
mod m20250301_000002_create_activity_log;
mod m20250301_000003_create_recruitment_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_accounts_tables::Migration),
            Box::new(m20250301_000002_create_activity_log::Migration),
            Box::new(m20250301_000003_create_recruitment_tables::Migration),
        ]
    }
}
