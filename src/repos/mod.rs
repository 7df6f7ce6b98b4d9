pub mod error;
pub mod todo_repo;
