//! Core library for the Vellum publishing backend.
//!
//! This crate implements the domain layer of a multi-tenant blogging
//! platform: the article status machine, role and ownership access
//! policy, localisation, persistence, and full-text search narrowing.
//! Transport adapters sit above this crate; nothing here speaks HTTP.
//! Only one database backend (either `sqlite` or `postgres`) should be
//! enabled at a time.

cfg_if::cfg_if! {
    if #[cfg(all(feature = "sqlite", feature = "postgres", not(feature = "lint")))] {
        compile_error!("Choose either sqlite or postgres, not both");
    } else if #[cfg(feature = "sqlite")] {
        pub use diesel::sqlite::Sqlite as DbBackend;
    } else if #[cfg(feature = "postgres")] {
        pub use diesel::pg::Pg as DbBackend;
    } else {
        compile_error!("Either the 'sqlite' or 'postgres' feature must be enabled");
    }
}

pub mod access;
pub mod admin;
pub mod articles;
pub mod cli;
pub mod context;
pub mod db;
pub mod dto;
pub mod error;
pub mod language;
pub mod localize;
pub mod models;
pub mod preview;
pub mod query;
pub mod schema;
pub mod search;
pub mod status;
