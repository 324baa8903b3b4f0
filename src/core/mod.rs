pub mod config;
pub mod context;
pub mod data_uri;
pub mod library;
pub mod logging;
pub mod memory;
pub mod storage;
pub mod utils;
