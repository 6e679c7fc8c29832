//! Library schema migration.
//!
//! Creates the students, books and transactions tables. Every statement is
//! `IF NOT EXISTS` so the migration adopts a database file that already
//! holds these tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::RfidId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Students::StudentName).string().not_null())
                    .col(ColumnDef::new(Students::Class).string().null())
                    .col(ColumnDef::new(Students::RollNumber).string().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Books::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Books::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Books::BookName).string().not_null())
                    .col(ColumnDef::new(Books::Author).string().null())
                    .col(ColumnDef::new(Books::Isbn).string().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::RfidId).string().not_null())
                    .col(ColumnDef::new(Transactions::BookId).integer().not_null())
                    .col(
                        ColumnDef::new(Transactions::IssueDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::ReturnDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::Returned)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_student")
                            .from(Transactions::Table, Transactions::RfidId)
                            .to(Students::Table, Students::RfidId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_book")
                            .from(Transactions::Table, Transactions::BookId)
                            .to(Books::Table, Books::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Active listing filters on returned and sorts by issue date
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_transactions_issue_date")
                    .table(Transactions::Table)
                    .col(Transactions::IssueDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_transactions_returned")
                    .table(Transactions::Table)
                    .col(Transactions::Returned)
                    .to_owned(),
            )
            .await?;

        // Book lookup on issue
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_books_name_author")
                    .table(Books::Table)
                    .col(Books::BookName)
                    .col(Books::Author)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Books::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Students {
    Table,
    RfidId,
    StudentName,
    Class,
    RollNumber,
}

#[derive(DeriveIden)]
enum Books {
    Table,
    Id,
    BookName,
    Author,
    Isbn,
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    RfidId,
    BookId,
    IssueDate,
    ReturnDate,
    Returned,
}
