//! `SeaORM` entities for the library schema.
//!
//! Table and column names match the existing `library.db` layout.

pub mod prelude;

pub mod books;
pub mod students;
pub mod transactions;
