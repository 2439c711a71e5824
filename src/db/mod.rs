pub mod connection;
pub mod migrations;
pub mod task_repo;
pub mod status_repo;
pub mod user_repo;

pub use connection::*;
