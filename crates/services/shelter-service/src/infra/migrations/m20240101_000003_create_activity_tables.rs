//! Migration: Create donations, adoptions and adoption follow-up tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // tp_ajuda / tp_pagamento / valor are shared with existing stored rows
        manager
            .create_table(
                Table::create()
                    .table(Donations::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Donations::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Donations::DonorId).uuid().not_null())
                    .col(ColumnDef::new(Donations::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(Donations::TpAjuda).string().not_null())
                    .col(ColumnDef::new(Donations::TpPagamento).string().null())
                    .col(ColumnDef::new(Donations::Valor).double().null())
                    .col(ColumnDef::new(Donations::ItemsDescription).text().null())
                    .col(ColumnDef::new(Donations::Date).date().not_null())
                    .col(ColumnDef::new(Donations::Note).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_donations_donor")
                            .from(Donations::Table, Donations::DonorId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_donations_project")
                            .from(Donations::Table, Donations::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_donations_project")
                    .table(Donations::Table)
                    .col(Donations::ProjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Adoptions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Adoptions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Adoptions::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(Adoptions::AdopterId).uuid().not_null())
                    .col(ColumnDef::new(Adoptions::AnimalId).uuid().not_null())
                    .col(ColumnDef::new(Adoptions::AdoptionDate).date().not_null())
                    .col(ColumnDef::new(Adoptions::LastUpdate).date().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_adoptions_project")
                            .from(Adoptions::Table, Adoptions::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_adoptions_adopter")
                            .from(Adoptions::Table, Adoptions::AdopterId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AdoptionUpdates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdoptionUpdates::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdoptionUpdates::AdoptionId).uuid().not_null())
                    .col(ColumnDef::new(AdoptionUpdates::ResponsibleId).uuid().not_null())
                    .col(ColumnDef::new(AdoptionUpdates::Status).string_len(32).not_null())
                    .col(ColumnDef::new(AdoptionUpdates::NextDate).date().null())
                    .col(ColumnDef::new(AdoptionUpdates::Note).text().null())
                    .col(
                        ColumnDef::new(AdoptionUpdates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_adoption_updates_adoption")
                            .from(AdoptionUpdates::Table, AdoptionUpdates::AdoptionId)
                            .to(Adoptions::Table, Adoptions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_adoption_updates_responsible")
                            .from(AdoptionUpdates::Table, AdoptionUpdates::ResponsibleId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdoptionUpdates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Adoptions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Donations::Table).to_owned())
            .await
    }
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
}

#[derive(Iden)]
enum Donations {
    Table,
    Id,
    DonorId,
    ProjectId,
    TpAjuda,
    TpPagamento,
    Valor,
    ItemsDescription,
    Date,
    Note,
}

#[derive(Iden)]
enum Adoptions {
    Table,
    Id,
    ProjectId,
    AdopterId,
    AnimalId,
    AdoptionDate,
    LastUpdate,
}

#[derive(Iden)]
enum AdoptionUpdates {
    Table,
    Id,
    AdoptionId,
    ResponsibleId,
    Status,
    NextDate,
    Note,
    CreatedAt,
}
