pub mod aggregate;
pub mod history;
pub mod initialize;
pub mod log;
pub mod pool;
pub mod queries;
pub mod stats;
