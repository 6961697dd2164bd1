//! Migration: Create projects and the per-project staff and donor associations.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Projects::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Projects::Name).string().not_null())
                    .col(ColumnDef::new(Projects::Description).text().null())
                    .col(ColumnDef::new(Projects::Email).string().null())
                    .col(ColumnDef::new(Projects::Phone).string().null())
                    .col(ColumnDef::new(Projects::Active).boolean().not_null().default(true))
                    .col(ColumnDef::new(Projects::AddressId).uuid().null())
                    .col(
                        ColumnDef::new(Projects::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Projects::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_projects_address")
                            .from(Projects::Table, Projects::AddressId)
                            .to(Addresses::Table, Addresses::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Employees::UserId).uuid().not_null())
                    .col(ColumnDef::new(Employees::ProjectId).uuid().not_null())
                    .col(
                        ColumnDef::new(Employees::Privileges)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Employees::Function).string().null())
                    .col(ColumnDef::new(Employees::Note).text().null())
                    .primary_key(
                        Index::create()
                            .col(Employees::UserId)
                            .col(Employees::ProjectId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employees_user")
                            .from(Employees::Table, Employees::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employees_project")
                            .from(Employees::Table, Employees::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Donors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Donors::UserId).uuid().not_null())
                    .col(ColumnDef::new(Donors::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(Donors::Frequency).string_len(16).not_null())
                    .col(ColumnDef::new(Donors::ReminderDate).date().null())
                    .col(ColumnDef::new(Donors::LastContribution).date().null())
                    .col(ColumnDef::new(Donors::NextContribution).date().null())
                    .col(ColumnDef::new(Donors::Note).text().null())
                    .primary_key(Index::create().col(Donors::UserId).col(Donors::ProjectId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_donors_user")
                            .from(Donors::Table, Donors::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_donors_project")
                            .from(Donors::Table, Donors::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Donors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Addresses {
    Table,
    Id,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Projects {
    Table,
    Id,
    Name,
    Description,
    Email,
    Phone,
    Active,
    AddressId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Employees {
    Table,
    UserId,
    ProjectId,
    Privileges,
    Function,
    Note,
}

#[derive(Iden)]
enum Donors {
    Table,
    UserId,
    ProjectId,
    Frequency,
    ReminderDate,
    LastContribution,
    NextContribution,
    Note,
}
