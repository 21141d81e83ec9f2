pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod logger;
pub mod model;
pub mod session;
pub mod storage;
pub mod store;
