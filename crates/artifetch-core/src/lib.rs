pub mod config;
pub mod logging;

pub mod cache;
pub mod checksum;
pub mod control;
pub mod fetch;
pub mod lock;
pub mod progress;
pub mod resolver;
pub mod storage;
pub mod transport;
pub mod url_model;
