use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Company {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Website,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Contact {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Role,
    CompanyId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Deal {
    Table,
    Id,
    Title,
    Value,
    Stage,
    Probability,
    ExpectedCloseDate,
    Owner,
    Notes,
    CompanyId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Company::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Company::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Company::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Company::Email).string_len(320))
                    .col(ColumnDef::new(Company::Phone).string_len(64))
                    .col(ColumnDef::new(Company::Website).string_len(512))
                    .col(ColumnDef::new(Company::Notes).text())
                    .col(
                        ColumnDef::new(Company::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Company::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_company_name")
                    .table(Company::Table)
                    .col(Company::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Contact::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contact::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Contact::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Contact::Email).string_len(320))
                    .col(ColumnDef::new(Contact::Phone).string_len(64))
                    .col(ColumnDef::new(Contact::Role).string_len(128))
                    .col(ColumnDef::new(Contact::CompanyId).integer().not_null())
                    .col(
                        ColumnDef::new(Contact::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contact::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contact_company")
                            .from(Contact::Table, Contact::CompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_contact_company")
                    .table(Contact::Table)
                    .col(Contact::CompanyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_contact_email")
                    .table(Contact::Table)
                    .col(Contact::Email)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Deal::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Deal::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Deal::Title).string_len(300).not_null())
                    .col(ColumnDef::new(Deal::Value).double().not_null().default(0.0))
                    .col(
                        ColumnDef::new(Deal::Stage)
                            .string_len(32)
                            .not_null()
                            .default("prospeccao"),
                    )
                    .col(ColumnDef::new(Deal::Probability).integer().not_null().default(0))
                    .col(ColumnDef::new(Deal::ExpectedCloseDate).date())
                    .col(ColumnDef::new(Deal::Owner).string_len(256))
                    .col(ColumnDef::new(Deal::Notes).text())
                    .col(ColumnDef::new(Deal::CompanyId).integer().not_null())
                    .col(
                        ColumnDef::new(Deal::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Deal::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deal_company")
                            .from(Deal::Table, Deal::CompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_deal_company")
                    .table(Deal::Table)
                    .col(Deal::CompanyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_deal_stage")
                    .table(Deal::Table)
                    .col(Deal::Stage)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Deal::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Contact::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Company::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
