//! Core business logic for Libris.
//!
//! This crate contains the loan lifecycle with ZERO web or database
//! dependencies. Persistence is reached only through the
//! [`library::LibraryStore`] trait, which the database crate implements.
//!
//! # Modules
//!
//! - `library` - Students, books, loans, due dates and overdue detection

pub mod library;
