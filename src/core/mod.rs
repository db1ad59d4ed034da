pub mod config;

pub use config::StoreConfig;
