pub mod delete;
pub mod logs;
pub mod upload;
