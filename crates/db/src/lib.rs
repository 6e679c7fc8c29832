//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for students, books and loan transactions
//! - The schema migration
//! - Sample-data seeding
//! - [`LibraryRepository`], the relational [`libris_core::library::LibraryStore`]

pub mod entities;
pub mod migration;
pub mod repositories;
pub mod seed;

pub use repositories::{LibraryRepository, LoanRepositoryError};
pub use seed::{SAMPLE_STUDENTS, SampleStudent, seed_sample_students};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use migration::Migrator;

/// Establishes a pooled connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(
    database_url: &str,
    max_connections: u32,
    min_connections: u32,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(max_connections)
        .min_connections(min_connections);
    Database::connect(options).await
}

/// Applies pending migrations and optionally seeds the demo students.
///
/// Returns the number of students inserted.
///
/// # Errors
///
/// Returns an error if a migration or seed statement fails.
pub async fn prepare(db: &DatabaseConnection, seed: bool) -> Result<u64, DbErr> {
    Migrator::up(db, None).await?;
    info!("Schema is up to date");

    if seed {
        seed_sample_students(db).await
    } else {
        Ok(0)
    }
}
