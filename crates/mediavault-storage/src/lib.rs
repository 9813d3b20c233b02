//! mediavault storage crate - SQLite persistence for media records.
//!
//! Provides a WAL-mode SQLite database with migrations and the
//! [`MediaRepository`], which owns every statement executed against the
//! `media_files` table.

pub mod db;
pub mod migrations;
pub mod repository;

pub use db::Database;
pub use repository::MediaRepository;
