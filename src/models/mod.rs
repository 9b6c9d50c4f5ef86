pub mod category;
pub mod event;
pub mod record;
pub mod student;
pub mod summary;
pub mod table;
