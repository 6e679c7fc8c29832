//! Shared configuration for Libris.
//!
//! Every binary loads one [`AppConfig`] at startup and hands the relevant
//! sections to the database and HTTP layers.

pub mod config;

pub use config::{AppConfig, DatabaseConfig, LibraryConfig, ServerConfig};
