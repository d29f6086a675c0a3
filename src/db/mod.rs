//! Database layer (SQLite via sqlx).

pub mod store;

pub use store::{Db, ParticipantOverview};
