mod database;

pub use database::*;
