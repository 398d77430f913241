pub mod config;
pub mod database;
pub mod error;
pub mod shop;
pub mod timing;

pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
pub const ISO_FORMAT_DATE: &str = "%Y-%m-%d";
