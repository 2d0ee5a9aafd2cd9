//! Persistence layer.
//!
//! The server talks to storage exclusively through the
//! [`reelforge_core::store::ReelStore`] trait; [`sqlite::SqliteReelStore`]
//! is the production implementation.

pub mod sqlite;
