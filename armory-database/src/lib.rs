pub mod database;
pub mod players;

pub use database::{Database, MIGRATOR};
