pub mod config;
pub mod datatype;

pub use config::Config;
