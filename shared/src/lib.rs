pub mod coinbase;
pub mod config;
pub mod database;
pub mod models;

pub use coinbase::CoinbaseClient;
pub use config::Config;
pub use database::InfluxClient;
pub use models::*;
