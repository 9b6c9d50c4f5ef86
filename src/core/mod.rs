pub mod bus;
pub mod config;
pub mod export;
pub mod history;
pub mod import;
pub mod log;
pub mod tracker;
pub mod views;
